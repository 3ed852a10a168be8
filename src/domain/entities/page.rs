use serde::{Deserialize, Serialize};

use crate::domain::entities::nomenclature::Nomenclature;

pub const PAGE_SIZE: usize = 25;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total_row_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NomenclaturePage {
    pub data: Vec<Nomenclature>,
    pub meta: PageMeta,
}
