pub mod campaigns;
pub mod charts;
pub mod health;
pub mod kpi;
pub mod leads;
pub mod responses;

// A failed fetch degrades that panel to an empty result set; the rest of the
// dashboard keeps rendering. No retry; the next request recomputes.
pub fn rows_or_empty<T>(panel: &'static str, result: Result<Vec<T>, sqlx::Error>) -> Vec<T> {
    match result {
        Ok(rows) => rows,
        Err(error) => {
            tracing::error!(panel, %error, "row fetch failed, serving empty result set");
            Vec::new()
        }
    }
}
