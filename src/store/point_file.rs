//! Point (`.cpf`) file access
//!
//! Layout, little endian:
//!
//! ```text
//! header   : magic "CPF1" | u16 version | u16 max returns | u32 record count
//! record   : 9 x channel block, fixed size
//! channel  : u8 return count | max returns x slot
//! slot     : f32 elevation | u16 status word | u8 filter reason
//! ```
//!
//! Records are fixed size so any index can be read or patched in place.
//! Updates only touch the validity bits and reason byte of returns whose
//! status changed; base-invalid returns are never written.

use crate::constants::{
    CHANNEL_COUNT, FORMAT_VERSION, HEADER_SIZE, POINT_MAGIC, RETURN_SLOT_SIZE, status,
};
use crate::error::{FilterError, Result, StoreKind};
use crate::models::{Channel, PointRecord, Return, ReturnStatus};
use crate::store::{OpenMode, PointStore};
use byteorder::{ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Cursor, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Byte offset of the status word inside a return slot
const STATUS_OFFSET: usize = 4;

/// An open point file
#[derive(Debug)]
pub struct PointFile {
    path: PathBuf,
    file: File,
    mode: OpenMode,
    max_returns: usize,
    record_count: usize,
}

impl PointFile {
    /// Open an existing point file
    pub fn open(path: impl AsRef<Path>, mode: OpenMode) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let open_error = |source| FilterError::StoreOpen {
            kind: StoreKind::Point,
            path: path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .read(true)
            .write(mode == OpenMode::Update)
            .open(&path)
            .map_err(open_error)?;

        let mut magic = [0u8; 4];
        file.read_exact(&mut magic).map_err(open_error)?;
        if &magic != POINT_MAGIC {
            return Err(FilterError::invalid_format(
                StoreKind::Point,
                &path,
                "missing CPF1 magic",
            ));
        }

        let version = file.read_u16::<LittleEndian>().map_err(open_error)?;
        if version != FORMAT_VERSION {
            return Err(FilterError::invalid_format(
                StoreKind::Point,
                &path,
                format!("unsupported version {version}"),
            ));
        }

        let max_returns = file.read_u16::<LittleEndian>().map_err(open_error)? as usize;
        let record_count = file.read_u32::<LittleEndian>().map_err(open_error)? as usize;
        let actual = file.metadata().map_err(open_error)?.len();

        let point_file = Self {
            path,
            file,
            mode,
            max_returns,
            record_count,
        };

        let expected = point_file.record_offset(record_count);
        if actual < expected {
            return Err(FilterError::invalid_format(
                StoreKind::Point,
                &point_file.path,
                format!("truncated: {actual} bytes, header requires {expected}"),
            ));
        }

        debug!(
            "Opened point file {} ({} records, {} returns per channel)",
            point_file.path.display(),
            record_count,
            max_returns
        );
        Ok(point_file)
    }

    /// Write a new point file holding `records`
    pub fn create(
        path: impl AsRef<Path>,
        max_returns: u16,
        records: &[PointRecord],
    ) -> Result<()> {
        let path = path.as_ref();
        let record_count = u32::try_from(records.len()).map_err(|_| {
            FilterError::invalid_format(StoreKind::Point, path, "too many records")
        })?;

        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(POINT_MAGIC)?;
        writer.write_u16::<LittleEndian>(FORMAT_VERSION)?;
        writer.write_u16::<LittleEndian>(max_returns)?;
        writer.write_u32::<LittleEndian>(record_count)?;

        for (index, record) in records.iter().enumerate() {
            for (channel, returns) in record.returns.iter() {
                if returns.len() > usize::from(max_returns) || returns.len() > u8::MAX as usize {
                    return Err(FilterError::invalid_format(
                        StoreKind::Point,
                        path,
                        format!(
                            "record {index} channel {channel} has {} returns, limit {max_returns}",
                            returns.len()
                        ),
                    ));
                }

                writer.write_u8(returns.len() as u8)?;
                for slot in 0..usize::from(max_returns) {
                    match returns.get(slot) {
                        Some(ret) => {
                            let (word, reason) = ret.to_raw();
                            writer.write_f32::<LittleEndian>(ret.elevation)?;
                            writer.write_u16::<LittleEndian>(word)?;
                            writer.write_u8(reason)?;
                        }
                        None => writer.write_all(&[0u8; RETURN_SLOT_SIZE])?,
                    }
                }
            }
        }

        writer.flush()?;
        Ok(())
    }

    /// Return slots stored per channel
    pub fn max_returns(&self) -> usize {
        self.max_returns
    }

    /// Flush pending updates to disk and release the handle
    pub fn close(self) -> Result<()> {
        if self.mode == OpenMode::Update {
            self.file.sync_all()?;
        }
        Ok(())
    }

    fn channel_block_size(&self) -> usize {
        1 + RETURN_SLOT_SIZE * self.max_returns
    }

    fn record_size(&self) -> usize {
        CHANNEL_COUNT * self.channel_block_size()
    }

    fn record_offset(&self, index: usize) -> u64 {
        HEADER_SIZE + (index as u64) * (self.record_size() as u64)
    }

    fn read_raw(&mut self, index: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; self.record_size()];
        self.file.seek(SeekFrom::Start(self.record_offset(index)))?;
        self.file.read_exact(&mut buf)?;
        Ok(buf)
    }

    fn decode(&self, buf: &[u8]) -> io::Result<PointRecord> {
        let mut cursor = Cursor::new(buf);
        let mut record = PointRecord::new();

        for channel in Channel::ALL {
            let block_start = cursor.position();
            let count = usize::from(cursor.read_u8()?);
            if count > self.max_returns {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "channel {channel} claims {count} returns, file holds {}",
                        self.max_returns
                    ),
                ));
            }

            let mut returns = Vec::with_capacity(count);
            for _ in 0..count {
                let elevation = cursor.read_f32::<LittleEndian>()?;
                let word = cursor.read_u16::<LittleEndian>()?;
                let reason = cursor.read_u8()?;
                returns.push(Return::from_raw(elevation, word, reason));
            }
            record.returns[channel] = returns;

            cursor.set_position(block_start + self.channel_block_size() as u64);
        }

        Ok(record)
    }
}

impl PointStore for PointFile {
    fn record_count(&self) -> usize {
        self.record_count
    }

    fn read_point_record(&mut self, index: usize) -> Result<PointRecord> {
        if index >= self.record_count {
            return Err(FilterError::RecordOutOfRange {
                kind: StoreKind::Point,
                index,
                count: self.record_count,
            });
        }

        let read_error = |source| FilterError::StoreRead {
            kind: StoreKind::Point,
            index,
            source,
        };
        let buf = self.read_raw(index).map_err(read_error)?;
        self.decode(&buf).map_err(read_error)
    }

    fn update_point_record(&mut self, index: usize, record: &PointRecord) -> Result<()> {
        if self.mode != OpenMode::Update {
            return Err(FilterError::store_write(index, "file opened read-only"));
        }
        if index >= self.record_count {
            return Err(FilterError::store_write(
                index,
                format!("index beyond {} records", self.record_count),
            ));
        }

        let mut buf = self
            .read_raw(index)
            .map_err(|e| FilterError::store_write_io(index, "reading stored record", e))?;

        let mut patched = 0;
        for (channel, returns) in record.returns.iter() {
            let block = channel.index() * self.channel_block_size();
            let stored = usize::from(buf[block]);
            if stored != returns.len() {
                return Err(FilterError::store_write(
                    index,
                    format!(
                        "channel {channel} has {} returns, file holds {stored}",
                        returns.len()
                    ),
                ));
            }

            for (slot, ret) in returns.iter().enumerate() {
                let pos = block + 1 + slot * RETURN_SLOT_SIZE + STATUS_OFFSET;
                let stored_word = LittleEndian::read_u16(&buf[pos..pos + 2]);
                let current = ReturnStatus::from_raw(stored_word, buf[pos + 2]);

                // Only slots whose status actually changed are rewritten
                if current == ReturnStatus::BaseInvalid
                    || ret.status == ReturnStatus::BaseInvalid
                    || current == ret.status
                {
                    continue;
                }

                let (bits, reason) = ret.status.to_raw();
                let word = (stored_word & !status::VALIDITY_MASK) | bits;
                LittleEndian::write_u16(&mut buf[pos..pos + 2], word);
                buf[pos + 2] = reason;
                patched += 1;
            }
        }

        if patched == 0 {
            return Ok(());
        }

        let offset = self.record_offset(index);
        self.file
            .seek(SeekFrom::Start(offset))
            .and_then(|_| self.file.write_all(&buf))
            .map_err(|e| FilterError::store_write_io(index, "writing record", e))?;

        debug!("Record {}: patched {} return statuses", index, patched);
        Ok(())
    }
}
