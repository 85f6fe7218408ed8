// ==========================================
// 紧固件目录导入系统 - 文件解析器实现
// ==========================================
// 支持: CSV (.csv)，分隔符可配置
// 约定: 表头必需；表头与值去首尾空白；行长度可不一致
// ==========================================

use crate::importer::catalog_importer_trait::{FileParser, RawRow};
use crate::importer::error::{ImportError, ImportResult};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser {
    delimiter: u8,
}

impl CsvParser {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new(b',')
    }
}

impl FileParser for CsvParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(path)?;
        self.parse_reader(Box::new(file))
    }

    fn parse_reader(&self, reader: Box<dyn Read + '_>) -> ImportResult<Vec<RawRow>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.delimiter)
            .flexible(true) // 允许行长度不一致
            .from_reader(reader);

        // 读取表头
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut row_map = HashMap::new();

            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), value.trim().to_string());
                }
            }

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push(row_map);
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn csv_file(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(temp_file, "{}", line).unwrap();
        }
        temp_file
    }

    #[test]
    fn test_csv_parser_valid_file() {
        let temp_file = csv_file(&[
            "Part No, Size ,Mat",
            "BOLT-001, M12-1.75 ,steel",
            "BOLT-002,1/2-13,STEEL",
        ]);

        let records = CsvParser::default()
            .parse_to_raw_records(temp_file.path())
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("Part No"), Some(&"BOLT-001".to_string()));
        assert_eq!(records[0].get("Size"), Some(&"M12-1.75".to_string()));
        assert_eq!(records[1].get("Mat"), Some(&"STEEL".to_string()));
    }

    #[test]
    fn test_csv_parser_file_not_found() {
        let result = CsvParser::default().parse_to_raw_records(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_csv_parser_rejects_other_extensions() {
        let temp_file = Builder::new().suffix(".xlsx").tempfile().unwrap();
        let result = CsvParser::default().parse_to_raw_records(temp_file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(ext)) if ext == "xlsx"));
    }

    #[test]
    fn test_csv_parser_skip_empty_rows() {
        let temp_file = csv_file(&["Part No,Price", "BOLT-001,0.25", ",", "BOLT-002,"]);

        let records = CsvParser::default()
            .parse_to_raw_records(temp_file.path())
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("Price"), Some(&"".to_string()));
    }

    #[test]
    fn test_csv_parser_custom_delimiter_and_short_rows() {
        let data = "Part No;Desc;Size\nBOLT-001;hex bolt\n";
        let records = CsvParser::new(b';')
            .parse_reader(Box::new(data.as_bytes()))
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("Desc"), Some(&"hex bolt".to_string()));
        assert_eq!(records[0].get("Size"), None);
    }
}
