use std::collections::HashMap;
use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::error::ElementsError;

/// A named two-line element set, exactly as published by the source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TleSet {
    pub name: String,
    pub line1: String,
    pub line2: String,
}

/// Pulls element groups from the configured URLs.
pub struct ElementsFetcher {
    client: reqwest::Client,
    urls: Vec<String>,
}

impl ElementsFetcher {
    pub fn new(urls: Vec<String>, timeout: Duration) -> Result<Self, ElementsError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, urls })
    }

    /// Fetch every configured group and merge whatever succeeded, keyed by
    /// satellite name. A failing URL is skipped, not fatal; the caller
    /// decides what an empty result means.
    pub async fn fetch(&self) -> HashMap<String, TleSet> {
        let mut merged = HashMap::new();

        for url in &self.urls {
            match self.fetch_group(url).await {
                Ok(sets) => {
                    info!("fetched {} element sets from {}", sets.len(), url);
                    merged.extend(sets.into_iter().map(|s| (s.name.clone(), s)));
                }
                Err(e) => warn!("failed to fetch {}: {}", url, e),
            }
        }

        merged
    }

    async fn fetch_group(&self, url: &str) -> Result<Vec<TleSet>, ElementsError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        Ok(parse_group(&body))
    }
}

/// Parse multi-satellite TLE text. 3-line entries carry a name line; bare
/// 2-line entries are keyed by the NORAD id field of line 1. Unrecognized
/// lines are skipped.
pub fn parse_group(content: &str) -> Vec<TleSet> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            let name = lines[i]
                .get(2..7)
                .map(|id| format!("NORAD {}", id.trim()))
                .unwrap_or_else(|| "UNKNOWN".to_string());
            result.push(TleSet {
                name,
                line1: lines[i].to_string(),
                line2: lines[i + 1].to_string(),
            });
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            result.push(TleSet {
                name: lines[i].to_string(),
                line1: lines[i + 1].to_string(),
                line2: lines[i + 2].to_string(),
            });
            i += 3;
        } else {
            i += 1;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUP: &str = "\
NOAA 15
1 25338U 98030A   26001.50000000  .00000100  00000-0  60000-4 0  9993
2 25338  98.5700 100.0000 0010000  90.0000 270.0000 14.25000000400000
NOAA 19
1 33591U 09005A   26001.50000000  .00000100  00000-0  60000-4 0  9996
2 33591  99.1000 200.0000 0014000 120.0000 240.0000 14.12000000350000
";

    #[test]
    fn parses_named_entries() {
        let sets = parse_group(GROUP);
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].name, "NOAA 15");
        assert!(sets[0].line1.starts_with("1 25338U"));
        assert!(sets[1].line2.starts_with("2 33591"));
    }

    #[test]
    fn parses_bare_two_line_entries() {
        let bare = "\
1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927
2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537
";
        let sets = parse_group(bare);
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].name, "NORAD 25544");
    }

    #[test]
    fn skips_stray_lines() {
        let noisy = format!("# comment line\n\n{}trailing junk\n", GROUP);
        let sets = parse_group(&noisy);
        assert_eq!(sets.len(), 2);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(parse_group("").is_empty());
    }
}
