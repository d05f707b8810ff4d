//! Waveform (`.cwf`) file access
//!
//! Layout, little endian:
//!
//! ```text
//! header : magic "CWF1" | u16 version | u16 packet size | u32 record count
//! index  : record count x u64 absolute record offset
//! record : 9 x u8 packet count | i16 samples of each channel in channel order
//! ```

use crate::constants::{CHANNEL_COUNT, FORMAT_VERSION, HEADER_SIZE, PACKET_SIZE, WAVEFORM_MAGIC};
use crate::error::{FilterError, Result, StoreKind};
use crate::models::{Channel, WaveformRecord};
use crate::store::WaveformStore;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::debug;

/// An open waveform file (always read-only)
#[derive(Debug)]
pub struct WaveformFile {
    reader: BufReader<File>,
    packet_size: usize,
    record_count: usize,
}

impl WaveformFile {
    /// Open an existing waveform file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let open_error = |source| FilterError::StoreOpen {
            kind: StoreKind::Waveform,
            path: path.clone(),
            source,
        };

        let file = File::open(&path).map_err(open_error)?;
        let file_len = file.metadata().map_err(open_error)?.len();
        let mut reader = BufReader::new(file);

        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic).map_err(open_error)?;
        if &magic != WAVEFORM_MAGIC {
            return Err(FilterError::invalid_format(
                StoreKind::Waveform,
                &path,
                "missing CWF1 magic",
            ));
        }

        let version = reader.read_u16::<LittleEndian>().map_err(open_error)?;
        if version != FORMAT_VERSION {
            return Err(FilterError::invalid_format(
                StoreKind::Waveform,
                &path,
                format!("unsupported version {version}"),
            ));
        }

        let packet_size = reader.read_u16::<LittleEndian>().map_err(open_error)? as usize;
        if packet_size == 0 {
            return Err(FilterError::invalid_format(
                StoreKind::Waveform,
                &path,
                "packet size is zero",
            ));
        }

        let record_count = reader.read_u32::<LittleEndian>().map_err(open_error)? as usize;
        let index_end = HEADER_SIZE + record_count as u64 * 8;
        if file_len < index_end {
            return Err(FilterError::invalid_format(
                StoreKind::Waveform,
                &path,
                format!("truncated record index: {file_len} bytes, need {index_end}"),
            ));
        }

        debug!(
            "Opened waveform file {} ({} records, {} samples per packet)",
            path.display(),
            record_count,
            packet_size
        );

        Ok(Self {
            reader,
            packet_size,
            record_count,
        })
    }

    /// Write a new waveform file holding `records`
    ///
    /// Every channel must hold a whole number of packets.
    pub fn create(path: impl AsRef<Path>, records: &[WaveformRecord]) -> Result<()> {
        let path = path.as_ref();
        let record_count = u32::try_from(records.len()).map_err(|_| {
            FilterError::invalid_format(StoreKind::Waveform, path, "too many records")
        })?;

        let mut packet_counts = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let mut counts = [0u8; CHANNEL_COUNT];
            for (channel, samples) in record.samples.iter() {
                let packets = samples.len() / PACKET_SIZE;
                if samples.len() % PACKET_SIZE != 0 || packets > u8::MAX as usize {
                    return Err(FilterError::invalid_format(
                        StoreKind::Waveform,
                        path,
                        format!(
                            "record {index} channel {channel} has {} samples, not a whole number of packets",
                            samples.len()
                        ),
                    ));
                }
                counts[channel.index()] = packets as u8;
            }
            packet_counts.push(counts);
        }

        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(WAVEFORM_MAGIC)?;
        writer.write_u16::<LittleEndian>(FORMAT_VERSION)?;
        writer.write_u16::<LittleEndian>(PACKET_SIZE as u16)?;
        writer.write_u32::<LittleEndian>(record_count)?;

        let mut offset = HEADER_SIZE + records.len() as u64 * 8;
        for record in records {
            writer.write_u64::<LittleEndian>(offset)?;
            let samples: usize = record.samples.iter().map(|(_, s)| s.len()).sum();
            offset += (CHANNEL_COUNT + samples * 2) as u64;
        }

        for (record, counts) in records.iter().zip(&packet_counts) {
            writer.write_all(counts)?;
            for (_, samples) in record.samples.iter() {
                for &sample in samples {
                    writer.write_i16::<LittleEndian>(sample)?;
                }
            }
        }

        writer.flush()?;
        Ok(())
    }

    fn read_record(&mut self, index: usize) -> io::Result<WaveformRecord> {
        self.reader
            .seek(SeekFrom::Start(HEADER_SIZE + index as u64 * 8))?;
        let offset = self.reader.read_u64::<LittleEndian>()?;
        self.reader.seek(SeekFrom::Start(offset))?;

        let mut counts = [0u8; CHANNEL_COUNT];
        self.reader.read_exact(&mut counts)?;

        let mut record = WaveformRecord::new();
        for channel in Channel::ALL {
            let len = usize::from(counts[channel.index()]) * self.packet_size;
            let mut samples = vec![0i16; len];
            self.reader.read_i16_into::<LittleEndian>(&mut samples)?;
            record.samples[channel] = samples;
        }

        Ok(record)
    }
}

impl WaveformStore for WaveformFile {
    fn record_count(&self) -> usize {
        self.record_count
    }

    fn read_waveform_record(&mut self, index: usize) -> Result<WaveformRecord> {
        if index >= self.record_count {
            return Err(FilterError::RecordOutOfRange {
                kind: StoreKind::Waveform,
                index,
                count: self.record_count,
            });
        }

        self.read_record(index)
            .map_err(|source| FilterError::StoreRead {
                kind: StoreKind::Waveform,
                index,
                source,
            })
    }
}
