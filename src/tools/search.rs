use serde::{Deserialize, Serialize};

const MAX_FILENAME_CHARS: usize = 64;

/// One torrent returned by the agent's search tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Torrent {
    pub filename: String,
    pub date: String,
    pub size: String,
    #[serde(default)]
    pub magnet_link: String,
    pub seeders: u64,
    pub leechers: u64,
    #[serde(default)]
    pub uploader: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub torrents: Vec<Torrent>,
}

/// Display row of the results table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TorrentRow {
    pub filename: String,
    pub date: String,
    pub size: String,
    pub seeders: String,
    pub leechers: String,
}

impl SearchResults {
    pub const COLUMNS: [&'static str; 5] = ["filename", "date", "size", "seeders", "leechers"];

    pub fn is_empty(&self) -> bool {
        self.torrents.is_empty()
    }

    pub fn rows(&self) -> Vec<TorrentRow> {
        self.torrents
            .iter()
            .map(|torrent| TorrentRow {
                filename: truncate_filename(&torrent.filename),
                date: torrent.date.clone(),
                size: torrent.size.clone(),
                seeders: torrent.seeders.to_string(),
                leechers: torrent.leechers.to_string(),
            })
            .collect()
    }
}

impl TorrentRow {
    pub fn cells(&self) -> [&str; 5] {
        [
            &self.filename,
            &self.date,
            &self.size,
            &self.seeders,
            &self.leechers,
        ]
    }
}

fn truncate_filename(filename: &str) -> String {
    if filename.chars().count() <= MAX_FILENAME_CHARS {
        return filename.to_string();
    }
    let mut short: String = filename.chars().take(MAX_FILENAME_CHARS).collect();
    short.push_str("...");
    short
}
