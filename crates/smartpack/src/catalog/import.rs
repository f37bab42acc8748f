use super::domain::NewProduct;
use super::numeric::{parse_f64, parse_quantity};
use std::io::Read;

pub const ACCEPTED_UPLOAD_TYPES: [&str; 3] = [
    "text/csv",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

#[derive(Debug, thiserror::Error)]
pub enum CatalogImportError {
    #[error("failed to read product file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid product CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Compares the media type essence, so `text/csv; charset=utf-8` is accepted.
pub fn is_accepted_upload_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    ACCEPTED_UPLOAD_TYPES.contains(&essence.as_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProductColumn {
    Name,
    Category,
    Length,
    Width,
    Height,
    Weight,
    Material,
    Quantity,
    Cost,
}

impl ProductColumn {
    fn from_header(header: &str) -> Option<Self> {
        let normalized = header.replace(['\u{feff}', '\u{200b}'], "");
        match normalized.trim().to_ascii_lowercase().as_str() {
            "name" | "product name" => Some(Self::Name),
            "category" => Some(Self::Category),
            "length" | "dimensions_length" => Some(Self::Length),
            "width" | "dimensions_width" => Some(Self::Width),
            "height" | "dimensions_height" => Some(Self::Height),
            "weight" => Some(Self::Weight),
            "material" => Some(Self::Material),
            "quantity" => Some(Self::Quantity),
            "cost" | "cost_per_unit" => Some(Self::Cost),
            _ => None,
        }
    }

    fn apply(self, product: &mut NewProduct, value: &str) {
        let measure = || Some(parse_f64(value).unwrap_or(0.0));
        match self {
            Self::Name => product.name = value.to_string(),
            Self::Category => product.category = Some(value.to_string()),
            Self::Length => product.dimensions_length = measure(),
            Self::Width => product.dimensions_width = measure(),
            Self::Height => product.dimensions_height = measure(),
            Self::Weight => product.weight = measure(),
            Self::Material => product.material = Some(value.to_string()),
            Self::Quantity => product.quantity = Some(parse_quantity(value).unwrap_or(1)),
            Self::Cost => product.cost_per_unit = measure(),
        }
    }
}

/// Decode product rows from a CSV upload.
///
/// The first record is the header. Rows shorter than the header, rows whose
/// first cell is blank, and rows without a product name are skipped.
pub fn parse_product_rows<R: Read>(reader: R) -> Result<Vec<NewProduct>, CatalogImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = csv_reader.records();

    let columns: Vec<Option<ProductColumn>> = match records.next() {
        Some(header) => header?.iter().map(ProductColumn::from_header).collect(),
        None => return Ok(Vec::new()),
    };

    let mut products = Vec::new();
    for record in records {
        let record = record?;
        if record.len() < columns.len() {
            continue;
        }
        if record.get(0).map_or(true, |first| first.trim().is_empty()) {
            continue;
        }

        let mut product = NewProduct::default();
        for (column, value) in columns.iter().zip(record.iter()) {
            let value = value.trim();
            if let (Some(column), false) = (column, value.is_empty()) {
                column.apply(&mut product, value);
            }
        }

        if !product.name.is_empty() {
            products.push(product);
        }
    }

    Ok(products)
}
