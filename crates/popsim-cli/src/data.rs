use crate::error::{CliError, Result};
use directories::ProjectDirs;
use futures_util::StreamExt;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use stdpopsim::core::maps::GeneticMap;
use tracing::{debug, info, warn};

const PATH_CONFIG_FILE: &str = "path.conf";

#[derive(Debug, Clone, Copy)]
pub enum DownloadProgress {
    Started { total_size: Option<u64> },
    Downloading { downloaded: u64 },
    Unpacking,
}

pub fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("org", "popgensims", "stdpopsim")
        .ok_or_else(|| CliError::Data("Could not determine the user's home directory.".to_string()))
}

/// Owns the local genetic map cache: where it lives, and how maps get into it.
#[derive(Debug)]
pub struct MapManager {
    cache_root: PathBuf,
}

impl MapManager {
    /// Uses `override_root` when given. Otherwise a path saved with `maps set-path`,
    /// falling back to the platform cache directory.
    pub fn new(override_root: Option<PathBuf>) -> Result<Self> {
        let cache_root = match override_root {
            Some(path) => path,
            None => {
                let dirs = project_dirs()?;
                read_path_file(&dirs.config_dir().join(PATH_CONFIG_FILE))?
                    .unwrap_or_else(|| dirs.cache_dir().to_path_buf())
            }
        };
        debug!("MapManager initialized with cache root: {:?}", &cache_root);
        Ok(Self { cache_root })
    }

    #[cfg(test)]
    pub fn with_root(cache_root: PathBuf) -> Self {
        Self { cache_root }
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    pub fn is_cached(&self, map: &GeneticMap) -> bool {
        map.is_cached(&self.cache_root)
    }

    /// Downloads `map` unless it is already cached.
    pub async fn ensure_cached(
        &self,
        map: &GeneticMap,
        progress_callback: impl FnMut(DownloadProgress),
    ) -> Result<()> {
        if self.is_cached(map) {
            debug!("Genetic map {} already cached", map.id);
            return Ok(());
        }
        self.download(map, false, progress_callback).await
    }

    pub async fn download(
        &self,
        map: &GeneticMap,
        force: bool,
        mut progress_callback: impl FnMut(DownloadProgress),
    ) -> Result<()> {
        let target = map.cache_dir(&self.cache_root);
        if target.exists() && !force {
            return Err(CliError::Data(format!(
                "Genetic map {} is already cached at {:?}. Use --force to overwrite.",
                map.id, target
            )));
        }

        info!("Downloading genetic map {} from {}", map.id, map.url);
        let client = reqwest::Client::new();
        let response = client.get(map.url).send().await?.error_for_status()?;

        let total_size = response.content_length();
        progress_callback(DownloadProgress::Started { total_size });

        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::with_capacity(total_size.unwrap_or(0) as usize);

        while let Some(item) = stream.next().await {
            let chunk = item?;
            buffer.extend_from_slice(&chunk);
            downloaded += chunk.len() as u64;
            progress_callback(DownloadProgress::Downloading { downloaded });
        }

        progress_callback(DownloadProgress::Unpacking);
        info!("Download complete ({} bytes). Unpacking archive...", downloaded);
        let count = tokio::task::block_in_place(|| self.install(map, &buffer))?;
        info!(
            "Genetic map {} installed to {:?} ({} chromosome maps)",
            map.id, target, count
        );
        Ok(())
    }

    /// Unpacks an archive into the map's cache directory, replacing any previous
    /// copy, and checks that every chromosome file parses. Returns the number of
    /// chromosome maps found.
    pub fn install(&self, map: &GeneticMap, archive: &[u8]) -> Result<usize> {
        let target = map.cache_dir(&self.cache_root);
        let parent = target
            .parent()
            .ok_or_else(|| CliError::Data(format!("Invalid cache directory {:?}", target)))?;
        fs::create_dir_all(parent)?;

        // Unpack next to the destination so the final move is a rename on one filesystem.
        let staging = tempfile::Builder::new()
            .prefix(".download-")
            .tempdir_in(parent)?;
        unpack(map.url, archive, staging.path())?;
        let content = single_top_level_dir(staging.path())?
            .unwrap_or_else(|| staging.path().to_path_buf());

        if target.exists() {
            fs::remove_dir_all(&target)?;
        }
        fs::rename(&content, &target)?;

        let maps = match map.load_all(&self.cache_root) {
            Ok(maps) => maps,
            Err(e) => {
                fs::remove_dir_all(&target)?;
                return Err(e.into());
            }
        };
        if maps.is_empty() {
            fs::remove_dir_all(&target)?;
            return Err(CliError::Data(format!(
                "The archive for {} contains no files matching '{}'",
                map.id, map.file_pattern
            )));
        }
        Ok(maps.len())
    }

    pub fn set_custom_path(path: &Path) -> Result<()> {
        let config_file = project_dirs()?.config_dir().join(PATH_CONFIG_FILE);
        write_path_file(&config_file, path)
    }

    pub fn reset_path() -> Result<()> {
        let config_file = project_dirs()?.config_dir().join(PATH_CONFIG_FILE);
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

fn read_path_file(config_file: &Path) -> Result<Option<PathBuf>> {
    if !config_file.exists() {
        return Ok(None);
    }
    let custom = fs::read_to_string(config_file)?.trim().to_string();
    if custom.is_empty() {
        warn!("Custom path config file is empty, falling back to default path.");
        return Ok(None);
    }
    Ok(Some(PathBuf::from(custom)))
}

fn write_path_file(config_file: &Path, path: &Path) -> Result<()> {
    let path = path.to_str().ok_or_else(|| {
        CliError::Argument(format!("Cache path {:?} is not valid UTF-8", path))
    })?;
    if let Some(parent) = config_file.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(config_file, path)?;
    Ok(())
}

/// Unpacks a `.tar.gz`, `.tgz` or `.tar.zst` archive, chosen by the URL's extension.
fn unpack(url: &str, archive: &[u8], dest: &Path) -> Result<()> {
    let reader: Box<dyn Read + '_> = if url.ends_with(".tar.zst") {
        Box::new(zstd::stream::read::Decoder::new(archive)?)
    } else if url.ends_with(".tar.gz") || url.ends_with(".tgz") {
        Box::new(flate2::read::GzDecoder::new(archive))
    } else {
        return Err(CliError::Data(format!("Unsupported archive format: {}", url)));
    };
    tar::Archive::new(reader).unpack(dest)?;
    Ok(())
}

/// Archives often wrap their files in one directory; returns it if so.
fn single_top_level_dir(dir: &Path) -> Result<Option<PathBuf>> {
    let entries = fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
    match entries.as_slice() {
        [entry] if entry.file_type()?.is_dir() => Ok(Some(entry.path())),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use tempfile::tempdir;

    const MAP: GeneticMap = GeneticMap {
        id: "Toy_v1",
        species: "toy",
        url: "https://example.org/toy_maps.tar.gz",
        file_pattern: "toy_{name}.txt",
        description: "toy map",
    };

    const CHR1: &str = "Chromosome\tPosition(bp)\tRate(cM/Mb)\tMap(cM)\n\
                        chr1\t0\t1.5\t0\n\
                        chr1\t5000\t0\t0.0075\n";

    fn tar_gz(files: &[(&str, &str)]) -> Vec<u8> {
        let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
        for (name, content) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, name, content.as_bytes())
                .unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap()
    }

    #[test]
    fn install_flattens_wrapping_directory() {
        let root = tempdir().unwrap();
        let manager = MapManager::with_root(root.path().to_path_buf());
        let archive = tar_gz(&[("toy_maps/toy_chr1.txt", CHR1), ("toy_maps/README", "toy")]);

        let count = manager.install(&MAP, &archive).unwrap();
        assert_eq!(count, 1);
        assert!(manager.is_cached(&MAP));
        assert!(MAP.contains_chromosome_map(root.path(), "chr1"));
        let map = MAP.get_chromosome_map(root.path(), "chr1").unwrap();
        assert_eq!(map.sequence_length(), 5000.0);
    }

    #[test]
    fn install_replaces_previous_copy() {
        let root = tempdir().unwrap();
        let manager = MapManager::with_root(root.path().to_path_buf());
        let stale = MAP.cache_dir(root.path());
        fs::create_dir_all(&stale).unwrap();
        fs::write(stale.join("toy_chrOld.txt"), "garbage").unwrap();

        manager
            .install(&MAP, &tar_gz(&[("toy_chr1.txt", CHR1)]))
            .unwrap();
        assert!(!stale.join("toy_chrOld.txt").exists());
        assert!(stale.join("toy_chr1.txt").exists());
    }

    #[test]
    fn install_rejects_archive_without_maps() {
        let root = tempdir().unwrap();
        let manager = MapManager::with_root(root.path().to_path_buf());
        let result = manager.install(&MAP, &tar_gz(&[("other.txt", "nothing")]));
        assert!(matches!(result, Err(CliError::Data(_))));
        assert!(!manager.is_cached(&MAP));
    }

    #[test]
    fn install_removes_unparsable_maps() {
        let root = tempdir().unwrap();
        let manager = MapManager::with_root(root.path().to_path_buf());
        let broken = "header\nchr1\tnot-a-number\t1.0\t0\n";
        let result = manager.install(&MAP, &tar_gz(&[("toy_chr1.txt", broken)]));
        assert!(matches!(result, Err(CliError::GeneticMap(_))));
        assert!(!manager.is_cached(&MAP));
    }

    #[test]
    fn unknown_archive_format_is_rejected() {
        let dir = tempdir().unwrap();
        let result = unpack("https://example.org/maps.zip", b"PK", dir.path());
        assert!(matches!(result, Err(CliError::Data(_))));
    }

    #[test]
    fn path_file_round_trip() {
        let dir = tempdir().unwrap();
        let config_file = dir.path().join("nested").join(PATH_CONFIG_FILE);
        assert_eq!(read_path_file(&config_file).unwrap(), None);

        write_path_file(&config_file, Path::new("/data/maps")).unwrap();
        assert_eq!(
            read_path_file(&config_file).unwrap(),
            Some(PathBuf::from("/data/maps"))
        );

        fs::write(&config_file, "  \n").unwrap();
        assert_eq!(read_path_file(&config_file).unwrap(), None);
    }

    #[test]
    fn explicit_root_wins() {
        let manager = MapManager::new(Some(PathBuf::from("/tmp/stdpopsim-cache"))).unwrap();
        assert_eq!(manager.cache_root(), Path::new("/tmp/stdpopsim-cache"));
    }
}
