/// Render a header row plus data rows as CSV bytes.
pub fn render(headers: &[&str], rows: &[Vec<String>]) -> Result<Vec<u8>, String> {
    let mut writer = csv::Writer::from_writer(vec![]);

    writer
        .write_record(headers)
        .map_err(|e| format!("CSV header write failed: {}", e))?;

    for row in rows {
        writer
            .write_record(row)
            .map_err(|e| format!("CSV row write failed: {}", e))?;
    }

    writer
        .into_inner()
        .map_err(|e| format!("CSV flush failed: {}", e))
}
