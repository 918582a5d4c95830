use std::fs::OpenOptions;
use std::io::{ErrorKind, Read};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use tokio::io::unix::AsyncFd;
use tokio::io::{AsyncReadExt, Interest};
use tracing::{debug, error, info};

use crate::controller::event_decoder::{decode, DecodeError, InputEvent, EVENT_SIZE};

// Reader errors
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    #[error("Cannot open device {path}: {source}")]
    StreamUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read from device {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl ReaderError {
    /// Operator-facing hint for errors a user can fix themselves
    pub fn guidance(&self) -> Option<&'static str> {
        match self {
            ReaderError::StreamUnavailable { source, .. } => match source.kind() {
                ErrorKind::NotFound => Some(
                    "Make sure the gamepad is connected and the device path is correct (e.g. /dev/input/js0).",
                ),
                ErrorKind::PermissionDenied => Some(
                    "Make sure you have permission to read the device: add your user to the 'input' group or run with sudo.",
                ),
                _ => Some("Make sure the device exists and you have permission to access it."),
            },
            _ => None,
        }
    }
}

// Open handle to the event source
#[derive(Debug)]
enum DeviceStream {
    // Device nodes and FIFOs, woken by the reactor so a pending read can be dropped
    Pollable(AsyncFd<std::fs::File>),
    // Recorded streams; regular files cannot be registered with epoll
    Regular(tokio::fs::File),
}

impl DeviceStream {
    fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(path)?;

        if file.metadata()?.is_file() {
            debug!("{} is a regular file, reading it as a recording", path.display());
            return Ok(Self::Regular(tokio::fs::File::from_std(file)));
        }

        Ok(Self::Pollable(AsyncFd::with_interest(file, Interest::READABLE)?))
    }

    async fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            Self::Regular(file) => file.read(buf).await,
            Self::Pollable(fd) => loop {
                let mut guard = fd.readable().await?;
                match guard.try_io(|inner| {
                    let mut file = inner.get_ref();
                    file.read(&mut *buf)
                }) {
                    Ok(result) => return result,
                    Err(_would_block) => continue,
                }
            },
        }
    }
}

/// Reader that has not touched the device yet
#[derive(Debug)]
pub struct Closed;

/// Reader holding an open device
#[derive(Debug)]
pub struct Streaming {
    device: DeviceStream,
}

#[derive(Debug)]
pub struct DeviceReader<S> {
    // Path of the joystick device node
    path: PathBuf,

    // Complete records decoded so far
    records_read: u64,

    state: S,
}

// Implementation of methods available in all states
impl<S> DeviceReader<S> {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records_read(&self) -> u64 {
        self.records_read
    }
}

// Implementation for Closed state
impl DeviceReader<Closed> {
    pub fn create(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        debug!("Creating DeviceReader for {}", path.display());
        Self {
            path,
            records_read: 0,
            state: Closed,
        }
    }

    /// Opens the device and transitions to the Streaming state.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(self) -> Result<DeviceReader<Streaming>, ReaderError> {
        info!("Opening device {}", self.path.display());

        let device = match DeviceStream::open(&self.path) {
            Ok(device) => device,
            Err(source) => {
                error!("Failed to open device {}: {}", self.path.display(), source);
                return Err(ReaderError::StreamUnavailable {
                    path: self.path,
                    source,
                });
            }
        };

        info!("Device opened, transitioning to Streaming state");
        Ok(DeviceReader {
            path: self.path,
            records_read: self.records_read,
            state: Streaming { device },
        })
    }
}

// Implementation for DeviceReader in Streaming state
impl DeviceReader<Streaming> {
    /// Reads and decodes the next record.
    ///
    /// Returns `Ok(None)` when the stream ends exactly on a record boundary.
    /// A stream that ends part-way through a record cannot be resynchronised
    /// and yields [`DecodeError::MalformedRecord`]. Dropping the future while
    /// it waits on an idle device leaves nothing running in the background.
    pub async fn next_event(&mut self) -> Result<Option<InputEvent>, ReaderError> {
        let mut buffer = [0u8; EVENT_SIZE];
        let mut filled = 0;

        while filled < EVENT_SIZE {
            let read = match self.state.device.read(&mut buffer[filled..]).await {
                Ok(read) => read,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => {
                    error!("Read from {} failed: {}", self.path.display(), source);
                    return Err(ReaderError::ReadFailed {
                        path: self.path.clone(),
                        source,
                    });
                }
            };

            if read == 0 {
                if filled == 0 {
                    info!(
                        "Device stream {} closed after {} records",
                        self.path.display(),
                        self.records_read
                    );
                    return Ok(None);
                }
                error!("Device stream ended inside a record ({} bytes)", filled);
                return Err(DecodeError::MalformedRecord { len: filled }.into());
            }

            filled += read;
        }

        let event = decode(&buffer)?;
        self.records_read += 1;
        debug!("Decoded record #{}: {:?}", self.records_read, event);

        Ok(Some(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::event_decoder::EVENT_BUTTON;
    use std::io::Write;
    use std::time::Duration;

    fn stream_file(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        file.write_all(bytes).expect("write records");
        file.flush().expect("flush records");
        file
    }

    fn make_fifo(path: &Path) {
        let status = std::process::Command::new("mkfifo")
            .arg(path)
            .status()
            .expect("run mkfifo");
        assert!(status.success(), "mkfifo failed");
    }

    #[tokio::test]
    async fn reads_records_until_clean_end() {
        let events = [
            InputEvent::new(10, 1, EVENT_BUTTON, 0),
            InputEvent::new(20, 0, EVENT_BUTTON, 0),
        ];
        let bytes: Vec<u8> = events.iter().flat_map(|e| e.to_ne_bytes()).collect();
        let file = stream_file(&bytes);

        let mut reader = DeviceReader::create(file.path()).open().unwrap();
        assert_eq!(reader.next_event().await.unwrap(), Some(events[0]));
        assert_eq!(reader.next_event().await.unwrap(), Some(events[1]));
        assert_eq!(reader.next_event().await.unwrap(), None);
        assert_eq!(reader.records_read(), 2);
    }

    #[tokio::test]
    async fn empty_stream_is_a_clean_end() {
        let file = stream_file(&[]);
        let mut reader = DeviceReader::create(file.path()).open().unwrap();
        assert_eq!(reader.next_event().await.unwrap(), None);
    }

    #[tokio::test]
    async fn partial_trailing_record_is_malformed() {
        let mut bytes = InputEvent::new(1, 1, EVENT_BUTTON, 3).to_ne_bytes().to_vec();
        bytes.extend_from_slice(&[0, 0, 0]);
        let file = stream_file(&bytes);

        let mut reader = DeviceReader::create(file.path()).open().unwrap();
        assert!(reader.next_event().await.unwrap().is_some());
        match reader.next_event().await {
            Err(ReaderError::Decode(DecodeError::MalformedRecord { len })) => assert_eq!(len, 3),
            other => panic!("expected malformed record, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_device_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("js9");

        let err = DeviceReader::create(&path).open().unwrap_err();
        match &err {
            ReaderError::StreamUnavailable { path: p, source } => {
                assert_eq!(p, &path);
                assert_eq!(source.kind(), ErrorKind::NotFound);
            }
            other => panic!("expected StreamUnavailable, got {:?}", other),
        }
        assert!(err.guidance().unwrap().contains("connected"));
    }

    #[tokio::test]
    async fn fifo_records_arrive_as_they_are_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("js0");
        make_fifo(&path);

        let mut reader = DeviceReader::create(&path).open().unwrap();
        let mut writer = OpenOptions::new().write(true).open(&path).unwrap();

        // Nothing written yet: the read stays pending
        let idle = tokio::time::timeout(Duration::from_millis(100), reader.next_event()).await;
        assert!(idle.is_err());

        let event = InputEvent::new(7, 1, EVENT_BUTTON, 2);
        writer.write_all(&event.to_ne_bytes()).unwrap();
        assert_eq!(reader.next_event().await.unwrap(), Some(event));

        drop(writer);
        assert_eq!(reader.next_event().await.unwrap(), None);
    }
}
