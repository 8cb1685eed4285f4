//! Derived claim columns.
//!
//! Decomposes the composite `INACBG` code into `CMG`, `CASETYPE`, `CBG` and
//! `SL`, and computes the tariff delta `Selisih = TOTAL_TARIF - TARIF_RS`.
//! Derivation is a pure function of the source columns, so running it on an
//! already-derived table yields the same table.

use casemix_core::coercion::{number_to_cell, to_number};
use casemix_core::models::{columns, ClaimTable};
use tracing::debug;

/// Split a composite code into exactly four parts.
///
/// Missing parts are empty; parts beyond the fourth are ignored.
///
/// ```
/// use casemix_data::deriver::split_composite_code;
///
/// assert_eq!(split_composite_code("A-1-II-0"), ["A", "1", "II", "0"]);
/// assert_eq!(split_composite_code("A-1"), ["A", "1", "", ""]);
/// ```
pub fn split_composite_code(code: &str) -> [&str; 4] {
    let mut parts = code.split('-');
    std::array::from_fn(|_| parts.next().unwrap_or(""))
}

/// `total - hospital` after coercing both to numbers.
pub fn tariff_delta(total: &str, hospital: &str) -> f64 {
    to_number(total) - to_number(hospital)
}

/// Return `table` with the derived columns set.
///
/// The four code parts and `Selisih` are appended after the raw columns, or
/// overwritten in place if the table already carries them. A missing
/// `INACBG` column yields empty parts; missing tariff columns read as `0`.
pub fn derive_columns(table: &ClaimTable) -> ClaimTable {
    let rows = table.len();

    let mut parts: [Vec<String>; 4] = std::array::from_fn(|_| Vec::with_capacity(rows));
    let mut delta: Vec<String> = Vec::with_capacity(rows);

    for row in 0..rows {
        let code = split_composite_code(table.value(row, columns::INACBG));
        for (column, part) in parts.iter_mut().zip(code) {
            column.push(part.to_string());
        }
        delta.push(number_to_cell(tariff_delta(
            table.value(row, columns::TOTAL_TARIF),
            table.value(row, columns::TARIF_RS),
        )));
    }

    if !table.has_column(columns::INACBG) {
        debug!("{} column absent; code parts left empty", columns::INACBG);
    }

    let mut derived = table.clone();
    for (name, values) in columns::INACBG_PARTS.iter().zip(parts) {
        derived = derived.with_column(name, values);
    }
    derived.with_column(columns::SELISIH, delta)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(records: &[&[&str]]) -> ClaimTable {
        ClaimTable::from_records(&["INACBG", "TOTAL_TARIF", "TARIF_RS"], records)
    }

    #[test]
    fn test_concrete_scenario() {
        let derived = derive_columns(&claims(&[&["A-1-II-0", "1000", "800"]]));
        assert_eq!(derived.value(0, "CMG"), "A");
        assert_eq!(derived.value(0, "CASETYPE"), "1");
        assert_eq!(derived.value(0, "CBG"), "II");
        assert_eq!(derived.value(0, "SL"), "0");
        assert_eq!(derived.value(0, "Selisih"), "200");
    }

    #[test]
    fn test_split_pads_short_codes() {
        assert_eq!(split_composite_code(""), ["", "", "", ""]);
        assert_eq!(split_composite_code("K"), ["K", "", "", ""]);
        assert_eq!(split_composite_code("K-4-17"), ["K", "4", "17", ""]);
    }

    #[test]
    fn test_split_ignores_extra_parts() {
        assert_eq!(split_composite_code("A-1-II-0-X-Y"), ["A", "1", "II", "0"]);
    }

    #[test]
    fn test_split_keeps_empty_inner_parts() {
        assert_eq!(split_composite_code("A--II-"), ["A", "", "II", ""]);
    }

    #[test]
    fn test_delta_non_numeric_reads_as_zero() {
        let derived = derive_columns(&claims(&[
            &["A-1-II-0", "abc", "800"],
            &["A-1-II-0", "1000", ""],
            &["A-1-II-0", "x", "y"],
        ]));
        assert_eq!(derived.value(0, "Selisih"), "-800");
        assert_eq!(derived.value(1, "Selisih"), "1000");
        assert_eq!(derived.value(2, "Selisih"), "0");
    }

    #[test]
    fn test_delta_is_per_row_and_order_independent() {
        let rows: [&[&str]; 3] = [
            &["A-1-II-0", "1000", "800"],
            &["B-2-I-1", "500", "900"],
            &["C-3-III-2", "12.5", "2"],
        ];
        let forward = derive_columns(&claims(&rows));
        let mut reversed_rows = rows;
        reversed_rows.reverse();
        let backward = derive_columns(&claims(&reversed_rows));

        for i in 0..3 {
            assert_eq!(
                forward.value(i, "Selisih"),
                backward.value(2 - i, "Selisih")
            );
        }
        assert_eq!(forward.value(1, "Selisih"), "-400");
        assert_eq!(forward.value(2, "Selisih"), "10.5");
    }

    #[test]
    fn test_missing_source_columns() {
        let table = ClaimTable::from_records(&["SEP"], &[&["0001"]]);
        let derived = derive_columns(&table);
        assert_eq!(derived.value(0, "CMG"), "");
        assert_eq!(derived.value(0, "SL"), "");
        assert_eq!(derived.value(0, "Selisih"), "0");
    }

    #[test]
    fn test_raw_columns_untouched_and_derived_appended() {
        let table = claims(&[&["A-1-II-0", "1000", "800"]]);
        let derived = derive_columns(&table);
        assert_eq!(
            derived.columns(),
            &["INACBG", "TOTAL_TARIF", "TARIF_RS", "CMG", "CASETYPE", "CBG", "SL", "Selisih"]
        );
        assert_eq!(derived.value(0, "INACBG"), "A-1-II-0");
        assert_eq!(table.columns().len(), 3);
    }

    #[test]
    fn test_derive_is_idempotent() {
        let table = claims(&[&["A-1-II-0", "1000", "800"], &["B-2", "7", "x"]]);
        let once = derive_columns(&table);
        let twice = derive_columns(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_table() {
        let derived = derive_columns(&claims(&[]));
        assert!(derived.is_empty());
        assert!(derived.has_column("Selisih"));
    }
}
