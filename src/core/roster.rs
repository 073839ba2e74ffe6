use crate::domain::model::{RosterRow, RosterSource, SourceFormat};
use crate::utils::error::{NotifyError, Result};
use crate::utils::validation::{validate_file_extension, SUPPORTED_EXTENSIONS};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;

pub const NAME_COLUMN: &str = "Name";
pub const EMAIL_COLUMN: &str = "Email";
pub const PERCENTAGE_COLUMN: &str = "Percentage";

const REQUIRED_COLUMNS: [&str; 3] = [NAME_COLUMN, EMAIL_COLUMN, PERCENTAGE_COLUMN];

#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// 文字一律原樣保留，數值轉換只在讀取 `Percentage` 時進行
    fn from_text(raw: &str) -> Self {
        if raw.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(raw.to_string())
        }
    }

    fn from_data(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::String(s) => Cell::from_text(s),
            other => Cell::Text(other.to_string()),
        }
    }

    fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.clone(),
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
            Cell::Empty => None,
        }
    }
}

/// 第一列為標題，其餘為資料列
struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    fn cell(row: &[Cell], index: usize) -> &Cell {
        row.get(index).unwrap_or(&Cell::Empty)
    }
}

/// 讀取整份名冊。缺少必要欄位時回傳 `NotifyError::Schema`，不回傳部分結果。
pub fn load_roster(source: &RosterSource) -> Result<Vec<RosterRow>> {
    let data = match source {
        RosterSource::Path(path) => {
            if !path.is_file() {
                return Err(NotifyError::InputNotFound {
                    path: path.display().to_string(),
                });
            }
            let file_name = path.display().to_string();
            if validate_file_extension("path", &file_name, SUPPORTED_EXTENSIONS).is_err() {
                return Err(NotifyError::UnsupportedSource { message: file_name });
            }
            std::fs::read(path)?
        }
        RosterSource::Bytes { data, .. } => data.clone(),
    };

    let table = match source.format() {
        SourceFormat::Csv => read_csv_table(&data)?,
        SourceFormat::Workbook => read_workbook_table(data)?,
    };

    let (Some(name_idx), Some(email_idx), Some(pct_idx)) = (
        table.column(NAME_COLUMN),
        table.column(EMAIL_COLUMN),
        table.column(PERCENTAGE_COLUMN),
    ) else {
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| table.column(name).is_none())
            .map(|name| name.to_string())
            .collect();
        tracing::error!("❌ Missing required columns: {}", missing.join(", "));
        return Err(NotifyError::Schema { missing });
    };

    let roster: Vec<RosterRow> = table
        .rows
        .iter()
        .filter(|row| row.iter().any(|cell| *cell != Cell::Empty))
        .map(|row| RosterRow {
            name: Table::cell(row, name_idx).as_text(),
            email: Table::cell(row, email_idx).as_text().trim().to_string(),
            percentage: Table::cell(row, pct_idx).as_number(),
        })
        .collect();

    tracing::debug!("Loaded {} roster rows from {}", roster.len(), source.display_name());
    Ok(roster)
}

/// 保留 `Percentage == 0` 的列，順序與來源相同
pub fn filter_zero_completion(roster: Vec<RosterRow>) -> Vec<RosterRow> {
    roster.into_iter().filter(RosterRow::has_zero_completion).collect()
}

pub fn select_zero_completion(source: &RosterSource) -> Result<Vec<RosterRow>> {
    let roster = load_roster(source)?;
    let total = roster.len();
    let selected = filter_zero_completion(roster);

    tracing::info!(
        "📋 {} of {} students have 0% completion",
        selected.len(),
        total
    );
    Ok(selected)
}

fn read_workbook_table(data: Vec<u8>) -> Result<Table> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(data))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(NotifyError::EmptyWorkbook)??;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(|cell| cell.to_string()).collect(),
        None => Vec::new(),
    };

    let rows: Vec<Vec<Cell>> = rows
        .map(|row| row.iter().map(Cell::from_data).collect::<Vec<_>>())
        .collect();

    Ok(Table { headers, rows })
}

fn read_csv_table(data: &[u8]) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(Cell::from_text).collect());
    }

    Ok(Table { headers, rows })
}
