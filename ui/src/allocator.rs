//! Which schemas each row of the form may offer.
//!
//! Both functions are recomputed from the current rows on every render; no
//! availability state is cached anywhere.

use std::collections::HashSet;

use crate::catalog::SchemaCatalog;
use crate::types::{SchemaOption, SchemaRow};

/// Options row `index` may show: everything no other row has claimed, plus
/// the row's own current value. An out-of-range index treats every row as
/// "other".
pub fn available_for(
    catalog: &SchemaCatalog,
    rows: &[SchemaRow],
    index: usize,
) -> Vec<SchemaOption> {
    let own = rows.get(index).and_then(|r| r.value.as_deref());
    let taken: HashSet<&str> = rows
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .filter_map(|(_, r)| r.value.as_deref())
        .collect();

    catalog
        .list()
        .iter()
        .filter(|opt| Some(opt.value.as_str()) == own || !taken.contains(opt.value.as_str()))
        .cloned()
        .collect()
}

/// True when every catalog value is held by some row, so no row can be added.
pub fn all_saturated(catalog: &SchemaCatalog, rows: &[SchemaRow]) -> bool {
    let claimed: HashSet<&str> = rows.iter().filter_map(|r| r.value.as_deref()).collect();
    catalog
        .list()
        .iter()
        .all(|opt| claimed.contains(opt.value.as_str()))
}
