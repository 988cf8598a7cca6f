//! Default digest providers: SHA-512 over raw bytes and over decoded content.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha512};

use auphorg_core::{ContentDigestProvider, ContentKind, FileInfo, FileInfoProvider, ProviderError};

const CHUNK_SIZE: usize = 64 * 1024; // 64 KB

/// SHA-512 of everything `reader` yields, as lowercase hex.
pub fn sha512_reader(mut reader: impl Read) -> std::io::Result<String> {
    let mut sha = Sha512::new();
    let mut buf = vec![0u8; CHUNK_SIZE];

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        sha.update(&buf[..n]);
    }

    Ok(format!("{:x}", sha.finalize()))
}

/// SHA-512 of an in-memory buffer, as lowercase hex.
pub fn sha512_bytes(bytes: &[u8]) -> String {
    format!("{:x}", Sha512::digest(bytes))
}

// ── Raw file ────────────────────────────────────────────────────────────────

/// Measures files by streaming their bytes through SHA-512.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha512FileInfo;

impl FileInfoProvider for Sha512FileInfo {
    fn file_info(&self, path: &Path) -> Result<FileInfo, ProviderError> {
        let file = File::open(path)?;
        let meta = file.metadata()?;
        let modified: DateTime<Utc> = meta.modified()?.into();
        let digest = sha512_reader(BufReader::new(file))?;

        Ok(FileInfo {
            digest,
            modified: modified.to_rfc3339(),
            size: meta.len(),
        })
    }
}

// ── Decoded content ─────────────────────────────────────────────────────────

/// Hashes decoded content so re-encoded containers with identical content
/// collide.
///
/// Images are decoded in-process, WAV audio is parsed down to its sample
/// frames, and video is transcoded to a canonical AVI stream by `ffmpeg`.
#[derive(Debug, Clone)]
pub struct DecodingDigester {
    ffmpeg: PathBuf,
}

impl DecodingDigester {
    pub fn new(ffmpeg: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
        }
    }

    fn image_digest(&self, path: &Path) -> Result<String, ProviderError> {
        let img = image::open(path).map_err(|e| ProviderError::decode(e.to_string()))?;
        Ok(sha512_bytes(img.as_bytes()))
    }

    fn video_digest(&self, path: &Path) -> Result<String, ProviderError> {
        let tool = self.ffmpeg.to_string_lossy().into_owned();
        let mut child = Command::new(&self.ffmpeg)
            .args(["-v", "error", "-nostdin", "-i"])
            .arg(path)
            .args(["-f", "avi", "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ProviderError::tool(&tool, e.to_string()))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ProviderError::tool(&tool, "stdout was not captured"))?;
        let digest = sha512_reader(stdout);
        let status = child.wait()?;

        if !status.success() {
            return Err(ProviderError::tool(tool, format!("exited with {}", status)));
        }
        Ok(digest?)
    }
}

impl Default for DecodingDigester {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl ContentDigestProvider for DecodingDigester {
    fn content_digest(&self, kind: ContentKind, path: &Path) -> Result<String, ProviderError> {
        match kind {
            ContentKind::Image => self.image_digest(path),
            ContentKind::Audio => wav_frames_digest(path),
            ContentKind::Video => self.video_digest(path),
        }
    }
}

/// SHA-512 over the sample frames of a RIFF/WAVE file.
///
/// Only the `data` chunk is hashed, so rewritten headers and extra chunks
/// (LIST, bext, ...) do not change the digest. A `fmt ` chunk must precede
/// the data.
pub fn wav_frames_digest(path: &Path) -> Result<String, ProviderError> {
    let mut reader = BufReader::new(File::open(path)?);

    let mut header = [0u8; 12];
    reader
        .read_exact(&mut header)
        .map_err(|_| ProviderError::decode("file too short for a RIFF header"))?;
    if &header[0..4] != b"RIFF" || &header[8..12] != b"WAVE" {
        return Err(ProviderError::decode("not a RIFF/WAVE file"));
    }

    let mut seen_fmt = false;
    loop {
        let mut chunk = [0u8; 8];
        if reader.read_exact(&mut chunk).is_err() {
            return Err(ProviderError::decode("no data chunk"));
        }
        let size = u32::from_le_bytes([chunk[4], chunk[5], chunk[6], chunk[7]]) as u64;

        match &chunk[0..4] {
            b"data" => {
                if !seen_fmt {
                    return Err(ProviderError::decode("data chunk before fmt chunk"));
                }
                let mut frames = (&mut reader).take(size);
                let mut sha = Sha512::new();
                let mut buf = vec![0u8; CHUNK_SIZE];
                let mut read = 0u64;
                loop {
                    let n = frames.read(&mut buf)?;
                    if n == 0 {
                        break;
                    }
                    sha.update(&buf[..n]);
                    read += n as u64;
                }
                if read < size {
                    return Err(ProviderError::decode(format!(
                        "truncated data chunk: expected {} bytes, got {}",
                        size, read
                    )));
                }
                return Ok(format!("{:x}", sha.finalize()));
            }
            id => {
                if id == b"fmt " {
                    seen_fmt = true;
                }
                // Chunks are padded to an even size.
                let skip = size + (size & 1);
                reader.seek(SeekFrom::Current(skip as i64))?;
            }
        }
    }
}
