use std::path::PathBuf;

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::application::AccountSummary;
use crate::config::AppConfig;
use crate::domain::format_cents;

pub const SUBJECT: &str = "Stori: Account Summary";
pub const LOGO_FILENAME: &str = "logo.png";

/// Composes and sends the HTML account-summary email over SMTP.
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    assets_dir: PathBuf,
}

impl Mailer {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .context("Failed to configure SMTP relay")?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ))
            .build();

        let sender = config
            .smtp_username
            .parse()
            .context("SMTP username is not a valid sender address")?;

        Ok(Self {
            transport,
            sender,
            assets_dir: config.assets_dir.clone(),
        })
    }

    /// Compose the summary body and send it to the account holder.
    pub async fn send_account_summary(&self, summary: &AccountSummary) -> Result<()> {
        let logo_base64 = self.encode_logo()?;
        let body = compose_summary_body(summary, &logo_base64);

        let to: Mailbox = summary
            .email
            .parse()
            .with_context(|| format!("invalid recipient address: {}", summary.email))?;

        let message = Message::builder()
            .from(self.sender.clone())
            .to(to)
            .subject(SUBJECT)
            .header(ContentType::TEXT_HTML)
            .body(body)
            .context("Failed to build email message")?;

        self.transport
            .send(message)
            .await
            .context("Failed to send email")?;

        tracing::info!(to = %summary.email, "account summary email sent");
        Ok(())
    }

    fn encode_logo(&self) -> Result<String> {
        let path = self.assets_dir.join(LOGO_FILENAME);
        let image = std::fs::read(&path)
            .with_context(|| format!("Failed to read logo at {}", path.display()))?;
        Ok(BASE64.encode(image))
    }
}

/// Build the HTML body. Separated from the transport so it can be tested
/// without a network.
pub fn compose_summary_body(summary: &AccountSummary, logo_base64: &str) -> String {
    let mut rows = String::new();
    for month in &summary.months {
        rows.push_str(&format!(
            "<tr>\
             <td>{}</td>\
             <td>{}</td>\
             <td>${}</td>\
             <td>${}</td>\
             </tr>\n",
            month.month,
            month.transaction_count,
            format_cents(month.average_debit),
            format_cents(month.average_credit),
        ));
    }

    format!(
        r#"<html>
<head>
    <title>Account Summary</title>
</head>
<body>
    <div style="text-align: center;">
        <img src="data:image/png;base64,{logo}" alt="Company Logo" style="width: 150px; height: auto;">
    </div>
    <h2>Account Summary for {account_number}</h2>
    <p>Total Balance: ${balance}</p>
    <table border="1" cellpadding="4" cellspacing="0">
        <tr>
            <th>Month</th>
            <th>Transactions</th>
            <th>Average Debit</th>
            <th>Average Credit</th>
        </tr>
{rows}    </table>
</body>
</html>"#,
        logo = logo_base64,
        account_number = summary.account_number,
        balance = format_cents(summary.current_balance),
        rows = rows,
    )
}
