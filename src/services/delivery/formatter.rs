//! Collection notice rendering.
//!
//! Renders an [`InvoiceRecord`] into the plain-text reminder sent to the
//! debtor. Currency uses Brazilian conventions by default (`R$ 1.234,56`)
//! and dates are always `dd/mm/yyyy`.

use bigdecimal::{BigDecimal, RoundingMode};
use thiserror::Error;

use crate::config::{CurrencyConfig, DeliveryConfig};
use crate::models::{Amount, DueDate, InvoiceRecord};

/// Placeholder used when the debtor name is missing
pub const DEFAULT_DEBTOR_NAME: &str = "Cliente";

/// Placeholder used when the document number is missing
pub const DEFAULT_DOCUMENT_NUMBER: &str = "N/A";

/// A record that cannot be rendered into a notice
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("amount '{0}' is not a number")]
    UnparsedAmount(String),

    #[error("due date is missing")]
    MissingDueDate,
}

/// Currency rendering conventions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub thousands_separator: String,
    pub decimal_separator: String,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::from(&CurrencyConfig::default())
    }
}

impl From<&CurrencyConfig> for CurrencyFormat {
    fn from(config: &CurrencyConfig) -> Self {
        Self {
            symbol: config.symbol.clone(),
            thousands_separator: config.thousands_separator.clone(),
            decimal_separator: config.decimal_separator.clone(),
        }
    }
}

impl CurrencyFormat {
    /// Render with two decimal places, rounding half to even
    pub fn render(&self, amount: &BigDecimal) -> String {
        let rounded = amount.with_scale_round(2, RoundingMode::HalfEven);
        let (cents, _) = rounded.into_bigint_and_exponent();
        let cents = cents.to_string();

        let (negative, digits) = match cents.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, cents.as_str()),
        };
        let digits = format!("{digits:0>3}");
        let (integer, fraction) = digits.split_at(digits.len() - 2);

        let sign = if negative { "-" } else { "" };
        format!(
            "{sign}{} {}{}{fraction}",
            self.symbol,
            self.group(integer),
            self.decimal_separator
        )
    }

    /// Rendering used when no amount is available
    pub fn zero(&self) -> String {
        self.render(&BigDecimal::from(0))
    }

    fn group(&self, integer: &str) -> String {
        let len = integer.len();
        let mut out = String::with_capacity(len + len / 3 * self.thousands_separator.len());
        for (i, ch) in integer.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                out.push_str(&self.thousands_separator);
            }
            out.push(ch);
        }
        out
    }
}

/// Settings the formatter needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterOptions {
    pub currency: CurrencyFormat,
    pub sender_name: String,
}

impl From<&DeliveryConfig> for FormatterOptions {
    fn from(config: &DeliveryConfig) -> Self {
        Self {
            currency: CurrencyFormat::from(&config.currency),
            sender_name: config.sender_name.clone(),
        }
    }
}

impl Default for FormatterOptions {
    fn default() -> Self {
        Self::from(&DeliveryConfig::default())
    }
}

/// Renders collection notices
#[derive(Debug, Clone, Default)]
pub struct MessageFormatter {
    options: FormatterOptions,
}

impl MessageFormatter {
    pub fn new(options: FormatterOptions) -> Self {
        Self { options }
    }

    /// Render the notice body for one record
    ///
    /// Missing name and document number fall back to placeholders and a
    /// missing amount renders as zero. An amount that is not a number or a
    /// missing due date has no safe default and fails.
    pub fn format(&self, record: &InvoiceRecord) -> Result<String, FormatError> {
        let amount = self.format_amount(record.amount.as_ref())?;
        let due_date = format_due_date(record.due_date.as_ref())?;

        let debtor = non_blank(record.debtor_name.as_deref()).unwrap_or(DEFAULT_DEBTOR_NAME);
        let document =
            non_blank(record.document_number.as_deref()).unwrap_or(DEFAULT_DOCUMENT_NUMBER);

        let mut body = format!(
            "Prezado(a) {debtor},\n\n\
             Esperamos que esteja bem!\n\
             Este é um lembrete amigável para informar que o boleto referente à fatura nº {document}, \
             no valor de {amount}, vencerá em breve, na data {due_date}.\n\n\
             💳 O pagamento pode ser realizado via internet banking, aplicativo do seu banco ou em casas lotéricas/agências bancárias.\n\n"
        );

        if let Some(barcode) = non_blank(record.barcode.as_deref()) {
            body.push_str(&format!("🔢 Código de barras: {}\n\n", barcode.trim()));
        }

        body.push_str(
            "Em caso de dúvidas ou se precisar da 2ª via do boleto, estamos à disposição para ajudar.\n\
             Agradecemos a preferência!\n\n\
             Atenciosamente,\n",
        );
        body.push_str(&self.options.sender_name);

        Ok(body)
    }

    fn format_amount(&self, amount: Option<&Amount>) -> Result<String, FormatError> {
        match amount {
            None => Ok(self.options.currency.zero()),
            Some(Amount::Value(value)) => Ok(self.options.currency.render(value)),
            Some(Amount::Unparsed(raw)) => Err(FormatError::UnparsedAmount(raw.clone())),
        }
    }
}

fn format_due_date(due_date: Option<&DueDate>) -> Result<String, FormatError> {
    match due_date {
        Some(DueDate::Date(date)) => Ok(date.strftime("%d/%m/%Y").to_string()),
        Some(DueDate::Text(raw)) if !raw.trim().is_empty() => Ok(raw.clone()),
        _ => Err(FormatError::MissingDueDate),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil;
    use std::str::FromStr;

    fn decimal(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn record() -> InvoiceRecord {
        InvoiceRecord {
            debtor_name: Some("Maria Silva".to_string()),
            document_number: Some("1001".to_string()),
            amount: Some(Amount::Value(decimal("1234.56"))),
            due_date: Some(DueDate::Date(civil::date(2024, 5, 10))),
            barcode: None,
            phone_raw: Some("11987654321".to_string()),
        }
    }

    #[test]
    fn test_currency_grouping() {
        let currency = CurrencyFormat::default();
        assert_eq!(currency.render(&decimal("1234.56")), "R$ 1.234,56");
        assert_eq!(currency.render(&decimal("1234567.8")), "R$ 1.234.567,80");
        assert_eq!(currency.render(&decimal("999")), "R$ 999,00");
        assert_eq!(currency.render(&decimal("0.5")), "R$ 0,50");
        assert_eq!(currency.render(&decimal("-12.3")), "-R$ 12,30");
    }

    #[test]
    fn test_currency_rounds_half_even() {
        let currency = CurrencyFormat::default();
        assert_eq!(currency.render(&decimal("10.125")), "R$ 10,12");
        assert_eq!(currency.render(&decimal("10.135")), "R$ 10,14");
    }

    #[test]
    fn test_currency_custom_separators() {
        let currency = CurrencyFormat {
            symbol: "$".to_string(),
            thousands_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
        };
        assert_eq!(currency.render(&decimal("98765.4")), "$ 98,765.40");
    }

    #[test]
    fn test_format_full_record() {
        let body = MessageFormatter::default().format(&record()).unwrap();

        assert!(body.starts_with("Prezado(a) Maria Silva,\n\n"));
        assert!(body.contains("fatura nº 1001"));
        assert!(body.contains("no valor de R$ 1.234,56"));
        assert!(body.contains("na data 10/05/2024."));
        assert!(!body.contains("Código de barras"));
        assert!(body.ends_with("Atenciosamente,\nVarejão Farma 💊"));
    }

    #[test]
    fn test_format_missing_amount_uses_zero() {
        let record = InvoiceRecord {
            amount: None,
            ..record()
        };
        let body = MessageFormatter::default().format(&record).unwrap();
        assert!(body.contains("no valor de R$ 0,00"));
    }

    #[test]
    fn test_format_zero_amount() {
        let record = InvoiceRecord {
            amount: Some(Amount::Value(decimal("0"))),
            ..record()
        };
        let body = MessageFormatter::default().format(&record).unwrap();
        assert!(body.contains("no valor de R$ 0,00"));
    }

    #[test]
    fn test_format_placeholders() {
        let record = InvoiceRecord {
            debtor_name: None,
            document_number: Some(" ".to_string()),
            ..record()
        };
        let body = MessageFormatter::default().format(&record).unwrap();
        assert!(body.starts_with("Prezado(a) Cliente,"));
        assert!(body.contains("fatura nº N/A"));
    }

    #[test]
    fn test_format_textual_due_date() {
        let record = InvoiceRecord {
            due_date: Some(DueDate::Text("2024-05-10 00:00:00".to_string())),
            ..record()
        };
        let body = MessageFormatter::default().format(&record).unwrap();
        assert!(body.contains("na data 2024-05-10 00:00:00."));
    }

    #[test]
    fn test_format_barcode_line() {
        let record = InvoiceRecord {
            barcode: Some("34191.79001 01043.510047".to_string()),
            ..record()
        };
        let body = MessageFormatter::default().format(&record).unwrap();
        assert!(body.contains("🔢 Código de barras: 34191.79001 01043.510047\n"));
    }

    #[test]
    fn test_format_errors() {
        let formatter = MessageFormatter::default();

        let unparsed = InvoiceRecord {
            amount: Some(Amount::Unparsed("abc".to_string())),
            ..record()
        };
        assert_eq!(
            formatter.format(&unparsed),
            Err(FormatError::UnparsedAmount("abc".to_string()))
        );

        let no_date = InvoiceRecord {
            due_date: None,
            ..record()
        };
        assert_eq!(formatter.format(&no_date), Err(FormatError::MissingDueDate));
    }

    #[test]
    fn test_custom_signature() {
        let formatter = MessageFormatter::new(FormatterOptions {
            sender_name: "Farmácia Central".to_string(),
            ..Default::default()
        });
        let body = formatter.format(&record()).unwrap();
        assert!(body.ends_with("\nFarmácia Central"));
    }
}
