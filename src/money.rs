use thiserror::Error;

// Monetary values travel over the wire as display strings ("R$ 1.234,56");
// internally everything is integer centavos.

#[derive(Debug, Error)]
pub enum MoneyError {
    #[error("invalid currency value: {0:?}")]
    Invalid(String),
}

/// Parse a BRL display string into centavos. The currency symbol is
/// stripped, dots are thousands separators and the comma is the decimal
/// separator.
pub fn parse_brl(texto: &str) -> Result<i64, MoneyError> {
    let normalizado = texto.replace("R$", "").replace('.', "").replace(',', ".");
    let valor: f64 = normalizado
        .trim()
        .parse()
        .map_err(|_| MoneyError::Invalid(texto.to_string()))?;
    Ok((valor * 100.0).round() as i64)
}

/// Format centavos back into the display convention: two fraction digits,
/// comma separator, no thousands grouping ("R$ 1234,56").
pub fn format_brl(centavos: i64) -> String {
    format!("R$ {},{:02}", centavos / 100, (centavos % 100).abs())
}
