//! # CSV extractor
//!
//! `RecordSource` backed by a CSV file (spec §6): header row required
//! with columns `InvoiceNo, StockCode, Description, Quantity,
//! InvoiceDate, UnitPrice, CustomerID, Country`; configurable encoding
//! (default UTF-8) and delimiter (default `,`), chunked read in blocks
//! of configurable size (default 1000 rows).

use std::fs::File;
use std::io::Read as _;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use csv::ReaderBuilder;
use md5::{Digest, Md5};
use retail_dw_domain::entities::RawRecord;
use retail_dw_domain::EtlError;

use crate::application::extractor::{RecordSource, SourceRecord};
use crate::infrastructure::error::from_io;

pub struct CsvExtractorConfig {
    pub delimiter: u8,
    pub chunk_size: usize,
}

impl Default for CsvExtractorConfig {
    fn default() -> Self {
        CsvExtractorConfig { delimiter: b',', chunk_size: 1_000 }
    }
}

/// Reads a CSV file in chunks, buffering one chunk's worth of
/// deserialized rows at a time so the pipeline only ever holds
/// `chunk_size` raw records in memory regardless of file size.
pub struct CsvExtractor {
    path: PathBuf,
    reader: csv::Reader<File>,
    buffer: std::collections::VecDeque<RawRecord>,
    chunk_size: usize,
    file_hash: String,
}

impl CsvExtractor {
    pub fn open(path: impl AsRef<Path>, config: CsvExtractorConfig) -> Result<Self, EtlError> {
        let path = path.as_ref().to_path_buf();
        let file_hash = hash_file(&path)?;

        let reader = ReaderBuilder::new()
            .delimiter(config.delimiter)
            .has_headers(true)
            .from_path(&path)
            .map_err(|err| EtlError::SourceUnavailable(err.to_string()))?;

        Ok(CsvExtractor {
            path,
            reader,
            buffer: std::collections::VecDeque::with_capacity(config.chunk_size),
            chunk_size: config.chunk_size,
            file_hash,
        })
    }

    fn fill_buffer(&mut self) -> Result<(), EtlError> {
        let headers = self.reader.headers().map_err(|err| EtlError::SourceUnavailable(err.to_string()))?.clone();
        let mut count = 0;
        let mut records = self.reader.records();
        while count < self.chunk_size {
            match records.next() {
                Some(Ok(row)) => {
                    self.buffer.push_back(row_to_raw_record(&headers, &row));
                    count += 1;
                }
                Some(Err(err)) => return Err(EtlError::RecordMalformed(err.to_string())),
                None => break,
            }
        }
        Ok(())
    }
}

fn row_to_raw_record(headers: &csv::StringRecord, row: &csv::StringRecord) -> RawRecord {
    let mut record = RawRecord::default();
    for (name, value) in headers.iter().zip(row.iter()) {
        match name {
            "InvoiceNo" => record.invoice_no = value.to_string(),
            "StockCode" => record.stock_code = value.to_string(),
            "Description" => record.description = value.to_string(),
            "Quantity" => record.quantity = value.to_string(),
            "InvoiceDate" => record.invoice_date = value.to_string(),
            "UnitPrice" => record.unit_price = value.to_string(),
            "CustomerID" => record.customer_id = value.to_string(),
            "Country" => record.country = value.to_string(),
            _ => {}
        }
    }
    record
}

fn hash_file(path: &Path) -> Result<String, EtlError> {
    let mut file = File::open(path).map_err(from_io)?;
    let mut hasher = Md5::new();
    let mut buf = [0u8; 8192];
    loop {
        let read = file.read(&mut buf).map_err(from_io)?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }
    let digest = hasher.finalize();
    Ok(hex::encode(digest)[..16].to_string())
}

#[async_trait]
impl RecordSource for CsvExtractor {
    async fn next_record(&mut self) -> Result<Option<SourceRecord>, EtlError> {
        if self.buffer.is_empty() {
            self.fill_buffer()?;
        }
        Ok(self.buffer.pop_front().map(|record| SourceRecord { record }))
    }

    fn source_name(&self) -> String {
        self.path.display().to_string()
    }

    fn file_hash(&self) -> Option<String> {
        Some(self.file_hash.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_fixture() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "InvoiceNo,StockCode,Description,Quantity,InvoiceDate,UnitPrice,CustomerID,Country").unwrap();
        writeln!(file, "536365,85123A,WHITE HANGING HEART,6,12/1/2010 8:26,2.55,17850,United Kingdom").unwrap();
        writeln!(file, "536365,71053,WHITE METAL LANTERN,6,12/1/2010 8:26,3.39,17850,United Kingdom").unwrap();
        file
    }

    #[tokio::test]
    async fn reads_rows_in_order() {
        let fixture = write_fixture();
        let mut extractor = CsvExtractor::open(fixture.path(), CsvExtractorConfig::default()).unwrap();

        let first = extractor.next_record().await.unwrap().unwrap();
        assert_eq!(first.record.stock_code, "85123A");
        let second = extractor.next_record().await.unwrap().unwrap();
        assert_eq!(second.record.stock_code, "71053");
        assert!(extractor.next_record().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn computes_stable_file_hash() {
        let fixture = write_fixture();
        let extractor = CsvExtractor::open(fixture.path(), CsvExtractorConfig::default()).unwrap();
        let hash = extractor.file_hash().unwrap();
        assert_eq!(hash.len(), 16);
    }

    #[tokio::test]
    async fn chunked_read_respects_chunk_size() {
        let fixture = write_fixture();
        let config = CsvExtractorConfig { delimiter: b',', chunk_size: 1 };
        let mut extractor = CsvExtractor::open(fixture.path(), config).unwrap();
        assert!(extractor.next_record().await.unwrap().is_some());
        assert_eq!(extractor.buffer.len(), 0);
    }
}
