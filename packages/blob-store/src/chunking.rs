//! The out-of-scope directory scanner/chunker glue: walks a root directory,
//! splits each regular file into fixed-size chunks, and hashes each chunk
//! with blake3 rendered as lowercase hex — the one place in the workspace
//! that knows what a [`swarmcast_primitives::ChunkHash`] actually looks
//! like (see its doc comment).
//!
//! No crate in the retrieval pack pulls in a directory-walking crate, so
//! this recurses by hand over `std::fs::read_dir` rather than reaching for
//! an ungrounded dependency.
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use swarmcast_primitives::batch::{Batch, ChunkRecord, FileRecord};
use swarmcast_primitives::ChunkHash;

#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    #[error("failed to read directory entry under {root}: {source}")]
    ReadDir { root: String, source: std::io::Error },

    #[error("failed to read file {path}: {source}")]
    ReadFile { path: String, source: std::io::Error },
}

/// Scans `root_dir`, splitting every regular file into `chunk_size_bytes`
/// chunks, and returns the resulting [`Batch`].
///
/// Files are visited in `read_dir` order at each directory level, recursing
/// depth-first; a vanished file between `read_dir` and `read` is treated as
/// a scan failure for this pass (spec §7 "Scanner failure": the previous
/// `Batch` remains authoritative, so the caller simply keeps it on `Err`).
pub fn scan(root_dir: &str, chunk_size_bytes: u64) -> Result<Batch, ScanError> {
    let root = Path::new(root_dir);

    let mut files = Vec::new();
    collect_files(root, root, &mut files)?;
    files.sort();

    let mut chunks = Vec::new();
    let mut file_records = Vec::new();

    for path in files {
        let relative = path.strip_prefix(root).unwrap_or(&path).display().to_string();

        let mut contents = Vec::new();
        fs::File::open(&path)
            .and_then(|mut f| f.read_to_end(&mut contents))
            .map_err(|source| ScanError::ReadFile {
                path: relative.clone(),
                source,
            })?;

        file_records.push(FileRecord {
            path: relative.clone(),
            size: contents.len() as u64,
        });

        for (index, window) in contents.chunks(chunk_size_bytes.max(1) as usize).enumerate() {
            let digest = blake3::hash(window);
            chunks.push(ChunkRecord {
                hash: ChunkHash::from(hex::encode(digest.as_bytes())),
                path: relative.clone(),
                pos: (index as u64) * chunk_size_bytes,
                size: window.len() as u64,
                cmpratio: 1.0,
            });
        }
    }

    Ok(Batch::new(chunks, file_records))
}

fn collect_files(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), ScanError> {
    let entries = fs::read_dir(dir).map_err(|source| ScanError::ReadDir {
        root: root.display().to_string(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| ScanError::ReadDir {
            root: root.display().to_string(),
            source,
        })?;

        let path = entry.path();

        if path.is_dir() {
            collect_files(root, &path, out)?;
        } else {
            out.push(path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::scan;

    fn unique_temp_dir() -> std::path::PathBuf {
        let suffix: u128 = std::time::SystemTime::UNIX_EPOCH.elapsed().map(|d| d.as_nanos()).unwrap_or(0);
        std::env::temp_dir().join(format!("swarmcast-chunking-test-{suffix}"))
    }

    #[test]
    fn it_should_split_a_file_into_chunks_of_the_configured_size() {
        let dir = unique_temp_dir();
        fs::create_dir_all(&dir).expect("should create temp dir");
        fs::write(dir.join("a.bin"), vec![7u8; 10]).expect("should write file");

        let batch = scan(dir.to_str().unwrap(), 4).expect("scan should succeed");

        assert_eq!(batch.chunks.len(), 3);
        assert_eq!(batch.chunks[0].size, 4);
        assert_eq!(batch.chunks[1].size, 4);
        assert_eq!(batch.chunks[2].size, 2);
        assert_eq!(batch.files.len(), 1);
        assert_eq!(batch.files[0].size, 10);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn identical_content_yields_identical_hashes() {
        let dir = unique_temp_dir();
        fs::create_dir_all(&dir).expect("should create temp dir");
        fs::write(dir.join("a.bin"), b"same content").expect("should write file");
        fs::write(dir.join("b.bin"), b"same content").expect("should write file");

        let batch = scan(dir.to_str().unwrap(), 1024).expect("scan should succeed");

        assert_eq!(batch.chunks.len(), 2);
        assert_eq!(batch.chunks[0].hash, batch.chunks[1].hash);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn an_empty_directory_yields_an_empty_batch() {
        let dir = unique_temp_dir();
        fs::create_dir_all(&dir).expect("should create temp dir");

        let batch = scan(dir.to_str().unwrap(), 1024).expect("scan should succeed");

        assert!(batch.is_empty());
        assert!(batch.files.is_empty());

        fs::remove_dir_all(&dir).ok();
    }
}
