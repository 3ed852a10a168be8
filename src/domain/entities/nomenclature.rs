use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

const DISPLAY_DATE_FORMAT: &str = "%d.%m.%Y %H:%M";

// Missing or `null` display fields decode as empty values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Nomenclature {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub nmid: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub brand: String,
    #[serde(deserialize_with = "null_as_default")]
    pub color: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub vendor_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    pub deleted_at: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub supplier: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Nomenclature {
    pub fn cell(&self, column: NomenclatureColumn) -> String {
        match column {
            NomenclatureColumn::Nmid => self.nmid.to_string(),
            NomenclatureColumn::VendorCode => self.vendor_code.clone(),
            NomenclatureColumn::Title => self.title.clone(),
            NomenclatureColumn::Color => self.color.clone(),
            NomenclatureColumn::Category => self.category.clone(),
            NomenclatureColumn::Brand => self.brand.clone(),
            NomenclatureColumn::Supplier => self.supplier.clone(),
            NomenclatureColumn::CreatedAt => format_timestamp(&self.created_at),
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NomenclatureColumn {
    Nmid,
    VendorCode,
    Title,
    Color,
    Category,
    Brand,
    Supplier,
    CreatedAt,
}

impl NomenclatureColumn {
    pub const ALL: [NomenclatureColumn; 8] = [
        NomenclatureColumn::Nmid,
        NomenclatureColumn::VendorCode,
        NomenclatureColumn::Title,
        NomenclatureColumn::Color,
        NomenclatureColumn::Category,
        NomenclatureColumn::Brand,
        NomenclatureColumn::Supplier,
        NomenclatureColumn::CreatedAt,
    ];

    // Key used by the server in `filters` and `sorting`.
    pub fn id(self) -> &'static str {
        match self {
            NomenclatureColumn::Nmid => "nmid",
            NomenclatureColumn::VendorCode => "vendorCode",
            NomenclatureColumn::Title => "title",
            NomenclatureColumn::Color => "color",
            NomenclatureColumn::Category => "category",
            NomenclatureColumn::Brand => "brand",
            NomenclatureColumn::Supplier => "supplier",
            NomenclatureColumn::CreatedAt => "createdAt",
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            NomenclatureColumn::Nmid => "МП ID",
            NomenclatureColumn::VendorCode => "Производитель",
            NomenclatureColumn::Title => "Название",
            NomenclatureColumn::Color => "Цвет",
            NomenclatureColumn::Category => "Категория",
            NomenclatureColumn::Brand => "Бренд",
            NomenclatureColumn::Supplier => "Компания",
            NomenclatureColumn::CreatedAt => "Дата создания",
        }
    }

    pub fn click_to_copy(self) -> bool {
        matches!(
            self,
            NomenclatureColumn::Nmid | NomenclatureColumn::VendorCode
        )
    }
}

/// Falls back to the raw value when the server sends something that is not a timestamp.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format(DISPLAY_DATE_FORMAT).to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return parsed.format(DISPLAY_DATE_FORMAT).to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_decodes_camel_case_and_type_tag() {
        let json = r#"{
            "id": "a1",
            "nmid": 1234567,
            "brand": "Acme",
            "color": "red",
            "title": "Boots",
            "vendorCode": "AC-01",
            "category": "Shoes",
            "createdAt": "2024-03-05T09:15:00Z",
            "deletedAt": null,
            "supplier": "Acme LLC",
            "type": "wb"
        }"#;

        let record: Nomenclature = serde_json::from_str(json).expect("record should decode");

        assert_eq!(record.vendor_code, "AC-01");
        assert_eq!(record.kind, "wb");
        assert!(!record.is_deleted());
        assert_eq!(
            record.cell(NomenclatureColumn::CreatedAt),
            "05.03.2024 09:15"
        );
        assert_eq!(record.cell(NomenclatureColumn::Nmid), "1234567");
    }

    #[test]
    fn null_and_missing_fields_decode_as_empty() {
        let json = r#"{
            "id": "a2",
            "nmid": null,
            "brand": "Acme",
            "color": null,
            "title": "Boots",
            "vendorCode": "AC-02",
            "createdAt": "2024-03-05T09:15:00Z"
        }"#;

        let record: Nomenclature = serde_json::from_str(json).expect("record should decode");

        assert_eq!(record.color, "");
        assert_eq!(record.kind, "");
        assert_eq!(record.category, "");
        assert_eq!(record.nmid, 0);
        assert_eq!(record.cell(NomenclatureColumn::Color), "");
        assert_eq!(record.vendor_code, "AC-02");
    }

    #[test]
    fn format_timestamp_keeps_unparseable_values() {
        assert_eq!(format_timestamp("yesterday"), "yesterday");
        assert_eq!(format_timestamp("2024-01-02 03:04:05"), "02.01.2024 03:04");
    }

    #[test]
    fn column_ids_are_unique_and_copy_flags_match() {
        let ids: std::collections::BTreeSet<_> = NomenclatureColumn::ALL
            .into_iter()
            .map(NomenclatureColumn::id)
            .collect();
        assert_eq!(ids.len(), NomenclatureColumn::ALL.len());
        let copyable: Vec<_> = NomenclatureColumn::ALL
            .into_iter()
            .filter(|column| column.click_to_copy())
            .collect();
        assert_eq!(
            copyable,
            vec![NomenclatureColumn::Nmid, NomenclatureColumn::VendorCode]
        );
    }
}
