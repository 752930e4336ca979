use serde_json::{json, Value};

use super::descriptor::{slug, JobDescriptor};

/// Materialize a descriptor as a Kubernetes `batch/v1` Job. The recorder
/// container receives the whole pass as environment variables, sleeps
/// `SLEEP_SECONDS`, then records.
pub fn job_manifest(job: &JobDescriptor, image: &str, recordings_claim: &str) -> Value {
    let sat_slug = slug(&job.satellite.name);

    let env: Vec<Value> = [
        ("SATELLITE_NAME", job.satellite.name.clone()),
        ("NORAD_ID", job.satellite.id.to_string()),
        ("FREQUENCY", job.satellite.frequency.to_string()),
        ("START_TIME", job.start_time.to_rfc3339()),
        ("END_TIME", job.end_time.to_rfc3339()),
        ("DURATION", job.duration_seconds.to_string()),
        ("MAX_ELEVATION", job.max_elevation_deg.to_string()),
        ("SLEEP_SECONDS", job.sleep_seconds.to_string()),
        ("GROUND_STATION_LAT", job.station.latitude.to_string()),
        ("GROUND_STATION_LON", job.station.longitude.to_string()),
        ("GROUND_STATION_ALT", job.station.altitude.to_string()),
    ]
    .iter()
    .map(|(name, value)| json!({ "name": name, "value": value }))
    .collect();

    json!({
        "apiVersion": "batch/v1",
        "kind": "Job",
        "metadata": {
            "name": job.name,
            "namespace": job.namespace,
            "labels": {
                "app": "satellite-recorder",
                "satellite": sat_slug,
                "managed-by": "overpass",
            },
        },
        "spec": {
            "backoffLimit": 1,
            "ttlSecondsAfterFinished": 3600,
            "template": {
                "metadata": {
                    "labels": {
                        "app": "satellite-recorder",
                        "satellite": sat_slug,
                        "pass-date": job.start_time.format("%Y-%m-%d").to_string(),
                    },
                },
                "spec": {
                    "restartPolicy": "Never",
                    "containers": [{
                        "name": "recorder",
                        "image": image,
                        "env": env,
                        "volumeMounts": [{
                            "name": "recordings-storage",
                            "mountPath": "/recordings",
                        }],
                        "resources": {
                            "requests": { "memory": "128Mi", "cpu": "100m" },
                            "limits": { "memory": "256Mi", "cpu": "200m" },
                        },
                    }],
                    "volumes": [{
                        "name": "recordings-storage",
                        "persistentVolumeClaim": { "claimName": recordings_claim },
                    }],
                },
            },
        },
    })
}
