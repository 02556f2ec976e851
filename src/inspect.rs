use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{self, Write};

use crate::paths::gitds_home;
use crate::settings::Settings;
use crate::store::{FsStore, Version};

fn open_store() -> Result<(Settings, FsStore)> {
    let settings = Settings::load(gitds_home()?)?;
    let store = FsStore::open(&settings.store_root)
        .with_context(|| format!("failed to open store at {}", settings.store_root.display()))?;
    Ok((settings, store))
}

/// One line of `gitds log` output: `<index> <short path> <title>`.
pub fn format_version_line(index: usize, v: &Version) -> String {
    format!(
        "{:>4} {} {} {}",
        index,
        v.short_path().yellow(),
        v.timestamp.format("%Y-%m-%d %H:%M:%S"),
        v.title
    )
}

/// CLI command: list the versions of `dataset`, oldest first.
///
/// Example output:
/// ```text
///    0 3f1c2ab 2024-05-01 10:12:03 init
///    1 9be0d41 2024-05-01 10:12:03 fix typo
/// ```
pub fn cmd_log(dataset: &str) -> Result<()> {
    let (settings, store) = open_store()?;
    let reference = settings.reference(dataset);
    let versions = store.log(&reference)?;
    for (i, v) in versions.iter().enumerate() {
        println!("{}", format_version_line(i, v));
    }
    Ok(())
}

/// CLI command: write the body of one version (latest by default) to stdout.
pub fn cmd_show(dataset: &str, version: Option<usize>) -> Result<()> {
    let (settings, store) = open_store()?;
    let reference = settings.reference(dataset);
    let body = store.body(&reference, version)?;
    io::stdout().write_all(&body)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn version_line_shows_index_short_path_and_title() {
        colored::control::set_override(false);
        let v = Version {
            path: "3f1c2ab0d9e8".to_string(),
            previous: None,
            title: "fix typo".to_string(),
            body_path: "body.csv".to_string(),
            body_hash: String::new(),
            body_size: 0,
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 10, 12, 3).unwrap(),
        };
        assert_eq!(
            format_version_line(1, &v),
            "   1 3f1c2ab 2024-05-01 10:12:03 fix typo"
        );
    }
}
