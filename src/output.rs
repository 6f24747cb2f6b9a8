use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use tokio::{fs, task::JoinSet};
use tracing::{debug, info};

use crate::{
    dataset::Dataset, info_time, Result, ALL_FILE, API_DIR, DIST_DIR, REDIRECTS_FILE, STATIC_DIR,
};

/// Where the artifacts go and where the static `_redirects` prefix is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub dist: PathBuf,
    pub static_dir: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            dist: PathBuf::from(DIST_DIR),
            static_dir: PathBuf::from(STATIC_DIR),
        }
    }
}

impl Paths {
    pub fn api_dir(&self) -> PathBuf {
        self.dist.join(API_DIR)
    }

    pub fn redirects_out(&self) -> PathBuf {
        self.dist.join(REDIRECTS_FILE)
    }

    pub fn redirects_prefix(&self) -> PathBuf {
        self.static_dir.join(REDIRECTS_FILE)
    }
}

pub async fn read_redirects_prefix(paths: &Paths) -> Result<String> {
    Ok(fs::read_to_string(paths.redirects_prefix()).await?)
}

/// Writes `all.json`, one `<code>.json` per country and `_redirects`.
/// The api directory is emptied first, so files of countries no longer in the table go away.
/// Every file is written by its own task; all of them are awaited before returning
/// and the first error, if any, is returned.
pub async fn write_dataset(dataset: &Dataset, paths: &Paths, redirects_prefix: &str) -> Result<()> {
    let start_time = Local::now();
    let api_dir = paths.api_dir();
    clear_dir(&api_dir).await?;
    fs::create_dir_all(&api_dir).await?;

    let mut task_set = JoinSet::new();

    spawn_write(
        &mut task_set,
        api_dir.join(ALL_FILE),
        to_json(&dataset.all())?,
    );
    for doc in dataset.per_country() {
        let file = api_dir.join(format!("{}.json", doc.data.slug()));
        spawn_write(&mut task_set, file, to_json(&doc)?);
    }
    spawn_write(
        &mut task_set,
        paths.redirects_out(),
        dataset.redirects(redirects_prefix),
    );

    let mut first_err = None;
    while let Some(task) = task_set.join_next().await {
        if let Err(e) = task.map_err(Into::into).and_then(|res| res) {
            first_err.get_or_insert(e);
        }
    }
    if let Some(e) = first_err {
        return Err(e);
    }

    info!(
        rows = dataset.records.len(),
        dist = %paths.dist.display(),
        "wrote country files"
    );
    info_time!(start_time, "Finished writing");
    Ok(())
}

async fn clear_dir(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir).await {
        Ok(()) => {
            debug!(path = %dir.display(), "cleared");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn spawn_write(task_set: &mut JoinSet<Result<()>>, path: PathBuf, contents: String) {
    task_set.spawn(async move { write_file(&path, contents).await });
}

async fn write_file(path: &Path, contents: String) -> Result<()> {
    fs::write(path, contents).await?;
    debug!(path = %path.display(), "wrote");
    Ok(())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{CountryRecord, Rate};
    use chrono::{TimeZone, Utc};
    use serde_json::Value;
    use tempfile::tempdir;

    fn dataset() -> Dataset {
        let record = |code, name: &str, rate| CountryRecord {
            code,
            name: name.into(),
            rate: Rate::new(rate).unwrap(),
        };
        Dataset::new(
            Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            vec![record("DE", "Germany", 19.0), record("EL", "Greece", 24.0)],
        )
    }

    #[tokio::test]
    async fn writes_every_artifact() {
        let tmp = tempdir().unwrap();
        let paths = Paths {
            dist: tmp.path().join("dist"),
            static_dir: tmp.path().join("static"),
        };

        write_dataset(&dataset(), &paths, "# static").await.unwrap();

        let all: Value =
            serde_json::from_str(&std::fs::read_to_string(paths.api_dir().join("all.json")).unwrap())
                .unwrap();
        assert_eq!(all["updatedAt"], "2024-01-02T03:04:05.000Z");
        assert_eq!(all["data"].as_array().unwrap().len(), 2);

        let el: Value =
            serde_json::from_str(&std::fs::read_to_string(paths.api_dir().join("el.json")).unwrap())
                .unwrap();
        assert_eq!(el["data"]["code"], "EL");
        assert_eq!(el["data"]["rate"], 24);
        assert!(paths.api_dir().join("de.json").is_file());

        let redirects = std::fs::read_to_string(paths.redirects_out()).unwrap();
        assert_eq!(
            redirects,
            "# static\n/api/de    /api/de.json 200!\n/api/el    /api/el.json 200!"
        );
    }

    #[tokio::test]
    async fn json_is_pretty_printed_with_two_spaces() {
        let tmp = tempdir().unwrap();
        let paths = Paths {
            dist: tmp.path().to_path_buf(),
            static_dir: tmp.path().to_path_buf(),
        };
        write_dataset(&dataset(), &paths, "").await.unwrap();

        let de = std::fs::read_to_string(paths.api_dir().join("de.json")).unwrap();
        assert!(de.starts_with("{\n  \"updatedAt\": "));
        assert!(de.contains("\n    \"code\": \"DE\","));
    }

    #[tokio::test]
    async fn replaces_previous_outputs() {
        let tmp = tempdir().unwrap();
        let paths = Paths {
            dist: tmp.path().to_path_buf(),
            static_dir: tmp.path().to_path_buf(),
        };
        std::fs::create_dir_all(paths.api_dir()).unwrap();
        std::fs::write(paths.api_dir().join("de.json"), "stale").unwrap();

        write_dataset(&dataset(), &paths, "").await.unwrap();

        let de = std::fs::read_to_string(paths.api_dir().join("de.json")).unwrap();
        assert!(de.contains("Germany"));
    }

    #[tokio::test]
    async fn drops_files_of_countries_no_longer_listed() {
        let tmp = tempdir().unwrap();
        let paths = Paths {
            dist: tmp.path().to_path_buf(),
            static_dir: tmp.path().to_path_buf(),
        };
        let first = Dataset::new(
            Utc::now(),
            vec![
                dataset().records[0].clone(),
                CountryRecord {
                    code: "UK",
                    name: "United Kingdom".into(),
                    rate: Rate::new(20.0).unwrap(),
                },
            ],
        );
        write_dataset(&first, &paths, "").await.unwrap();
        assert!(paths.api_dir().join("uk.json").is_file());

        let second = Dataset::new(Utc::now(), vec![dataset().records[0].clone()]);
        write_dataset(&second, &paths, "").await.unwrap();

        assert!(!paths.api_dir().join("uk.json").exists());
        assert!(paths.api_dir().join("de.json").is_file());
        let redirects = std::fs::read_to_string(paths.redirects_out()).unwrap();
        assert!(!redirects.contains("/api/uk"));
    }

    #[tokio::test]
    async fn reads_prefix_from_static_dir() {
        let tmp = tempdir().unwrap();
        let paths = Paths {
            dist: tmp.path().join("dist"),
            static_dir: tmp.path().to_path_buf(),
        };
        std::fs::write(tmp.path().join("_redirects"), "/  /api/all.json 200").unwrap();
        assert_eq!(
            read_redirects_prefix(&paths).await.unwrap(),
            "/  /api/all.json 200"
        );
    }
}
