//! HTML rendering
//!
//! Rendering is a pure function of [`ReportData`] and the generation time so
//! the output can be compared byte for byte in tests.

use super::live::LiveInfo;
use crate::core::Network;
use crate::provision::COMPLETION_MESSAGE;
use serde_json::{Map, Value};
use std::fmt::Write as _;

/// Shown for metadata fields that are missing
pub const NOT_AVAILABLE: &str = "N/A";

/// Shown when no execution log exists
pub const LOG_UNAVAILABLE: &str = "Creation log not available";

const STYLE: &str = r#"
        body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; line-height: 1.6; margin: 0; padding: 20px; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); min-height: 100vh; }
        .container { max-width: 1200px; margin: 0 auto; background: white; border-radius: 20px; box-shadow: 0 20px 40px rgba(0, 0, 0, 0.1); overflow: hidden; }
        .header { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 40px; text-align: center; }
        .header h1 { margin: 0; font-size: 2.5rem; }
        .header p { margin: 10px 0 0 0; font-size: 1.2rem; opacity: 0.9; }
        .content { padding: 40px; }
        .section { margin-bottom: 40px; padding: 30px; background: #f8f9fa; border-radius: 15px; border-left: 5px solid #667eea; }
        .section h2 { margin-top: 0; color: #333; font-size: 1.8rem; }
        .info-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(300px, 1fr)); gap: 20px; margin-top: 20px; }
        .info-item { background: white; padding: 20px; border-radius: 10px; box-shadow: 0 5px 15px rgba(0, 0, 0, 0.1); }
        .info-item h3 { margin-top: 0; color: #667eea; font-size: 1.2rem; }
        .info-item p { margin: 10px 0; word-break: break-all; }
        .address { font-family: 'Courier New', monospace; background: #f1f3f4; padding: 10px; border-radius: 5px; font-size: 0.9rem; }
        .btn { display: inline-block; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; text-decoration: none; padding: 12px 24px; border-radius: 8px; font-weight: 600; }
        .status-success { color: #28a745; font-weight: 600; }
        .status-incomplete { color: #d97706; font-weight: 600; }
        .log-container { background: #2d3748; color: #e2e8f0; padding: 20px; border-radius: 10px; font-family: 'Courier New', monospace; font-size: 0.9rem; max-height: 400px; overflow-y: auto; white-space: pre-wrap; }
        .timestamp { color: #a0aec0; font-size: 0.9rem; }
        @media (max-width: 768px) {
            .container { margin: 10px; border-radius: 10px; }
            .header, .content { padding: 20px; }
            .header h1 { font-size: 2rem; }
            .info-grid { grid-template-columns: 1fr; }
        }
"#;

/// Everything a report shows
#[derive(Debug, Clone)]
pub struct ReportData {
    pub mint_address: String,
    pub network: Network,
    pub wallet_address: Option<String>,
    /// Raw metadata record; empty when the file is missing or corrupt
    pub metadata: Map<String, Value>,
    pub live: LiveInfo,
    pub creation_log: Option<String>,
}

impl ReportData {
    /// Whether the log records a completed run for this mint
    pub fn is_complete(&self) -> bool {
        self.creation_log.as_deref().map_or(false, |log| {
            log.contains(COMPLETION_MESSAGE) && log.contains(&self.mint_address)
        })
    }

    /// Metadata field as display text, `N/A` when absent
    fn field(&self, key: &str) -> String {
        match self.metadata.get(key) {
            None | Some(Value::Null) => NOT_AVAILABLE.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    fn image(&self) -> Option<&str> {
        self.metadata
            .get("image")
            .and_then(Value::as_str)
            .filter(|url| !url.trim().is_empty())
    }
}

/// Escape text for interpolation into HTML body or attribute values
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the full report document
pub fn render_html(data: &ReportData, generated_at: &str) -> String {
    let name = data
        .metadata
        .get("name")
        .and_then(Value::as_str)
        .map(escape_html);
    let explorer_url = escape_html(&data.network.explorer_url(&data.mint_address));
    let (status_class, status) = if data.is_complete() {
        ("status-success", "✅ Created Successfully")
    } else {
        ("status-incomplete", "⚠️ Incomplete")
    };

    let mut html = String::with_capacity(8192);

    let _ = writeln!(html, "<!DOCTYPE html>");
    let _ = writeln!(html, "<html lang=\"en\">");
    let _ = writeln!(html, "<head>");
    let _ = writeln!(html, "    <meta charset=\"UTF-8\">");
    let _ = writeln!(
        html,
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
    );
    let _ = writeln!(
        html,
        "    <title>Token Creation Report - {}</title>",
        name.as_deref().unwrap_or("Unknown Token")
    );
    let _ = writeln!(html, "    <style>{}    </style>", STYLE);
    let _ = writeln!(html, "</head>");
    let _ = writeln!(html, "<body>");
    let _ = writeln!(html, "<div class=\"container\">");

    // Header
    let _ = writeln!(html, "    <div class=\"header\">");
    let _ = writeln!(
        html,
        "        <h1>🪙 {}</h1>",
        name.as_deref().unwrap_or("Token Creation Report")
    );
    let _ = writeln!(html, "        <p>Solana Token Creation Report</p>");
    let _ = writeln!(
        html,
        "        <p class=\"timestamp\">Generated on {}</p>",
        escape_html(generated_at)
    );
    let _ = writeln!(html, "    </div>");
    let _ = writeln!(html, "    <div class=\"content\">");

    // Token information
    let _ = writeln!(html, "        <div class=\"section\">");
    let _ = writeln!(html, "            <h2>📊 Token Information</h2>");
    let _ = writeln!(html, "            <div class=\"info-grid\">");
    let _ = writeln!(html, "                <div class=\"info-item\">");
    let _ = writeln!(html, "                    <h3>Token Details</h3>");
    for (label, key) in [
        ("Name", "name"),
        ("Symbol", "symbol"),
        ("Description", "description"),
        ("Decimals", "decimals"),
    ] {
        let _ = writeln!(
            html,
            "                    <p><strong>{}:</strong> {}</p>",
            label,
            escape_html(&data.field(key))
        );
    }
    let _ = writeln!(html, "                </div>");
    let _ = writeln!(html, "                <div class=\"info-item\">");
    let _ = writeln!(html, "                    <h3>Network Information</h3>");
    let _ = writeln!(
        html,
        "                    <p><strong>Network:</strong> {}</p>",
        data.network.title()
    );
    let _ = writeln!(
        html,
        "                    <p><strong>Status:</strong> <span class=\"{}\">{}</span></p>",
        status_class, status
    );
    let _ = writeln!(
        html,
        "                    <p><strong>Supply:</strong> {}</p>",
        escape_html(&data.live.supply)
    );
    let _ = writeln!(
        html,
        "                    <p><strong>Created:</strong> {}</p>",
        escape_html(&data.field("created_at"))
    );
    let _ = writeln!(html, "                </div>");
    let _ = writeln!(html, "            </div>");
    let _ = writeln!(html, "        </div>");

    // Addresses
    let _ = writeln!(html, "        <div class=\"section\">");
    let _ = writeln!(html, "            <h2>🔗 Addresses &amp; Links</h2>");
    let _ = writeln!(html, "            <div class=\"info-grid\">");
    let _ = writeln!(html, "                <div class=\"info-item\">");
    let _ = writeln!(html, "                    <h3>Token Mint Address</h3>");
    let _ = writeln!(
        html,
        "                    <div class=\"address\">{}</div>",
        escape_html(&data.mint_address)
    );
    let _ = writeln!(
        html,
        "                    <p style=\"margin-top: 15px;\"><a href=\"{}\" target=\"_blank\" class=\"btn\">View on Solana Explorer</a></p>",
        explorer_url
    );
    let _ = writeln!(html, "                </div>");
    if let Some(wallet) = data.wallet_address.as_deref().filter(|w| !w.is_empty()) {
        let _ = writeln!(html, "                <div class=\"info-item\">");
        let _ = writeln!(html, "                    <h3>Creator Wallet</h3>");
        let _ = writeln!(
            html,
            "                    <div class=\"address\">{}</div>",
            escape_html(wallet)
        );
        let _ = writeln!(html, "                </div>");
    }
    let _ = writeln!(html, "            </div>");
    let _ = writeln!(html, "        </div>");

    if let Some(image) = data.image() {
        let image = escape_html(image);
        let _ = writeln!(html, "        <div class=\"section\">");
        let _ = writeln!(html, "            <h2>🖼️ Token Image</h2>");
        let _ = writeln!(html, "            <div class=\"info-item\">");
        let _ = writeln!(
            html,
            "                <img src=\"{}\" alt=\"Token Image\" style=\"max-width: 200px; border-radius: 10px;\" onerror=\"this.style.display='none'\">",
            image
        );
        let _ = writeln!(
            html,
            "                <p><strong>Image URL:</strong> {}</p>",
            image
        );
        let _ = writeln!(html, "            </div>");
        let _ = writeln!(html, "        </div>");
    }

    // Log and raw data
    let log = data.creation_log.as_deref().unwrap_or(LOG_UNAVAILABLE);
    let _ = writeln!(html, "        <div class=\"section\">");
    let _ = writeln!(html, "            <h2>📝 Creation Log</h2>");
    let _ = writeln!(
        html,
        "            <div class=\"log-container\">{}</div>",
        escape_html(log)
    );
    let _ = writeln!(html, "        </div>");

    let metadata = serde_json::to_string_pretty(&data.metadata).unwrap_or_else(|_| "{}".into());
    let _ = writeln!(html, "        <div class=\"section\">");
    let _ = writeln!(html, "            <h2>📋 Raw Metadata</h2>");
    let _ = writeln!(
        html,
        "            <div class=\"log-container\">{}</div>",
        escape_html(&metadata)
    );
    let _ = writeln!(html, "        </div>");

    if data
        .live
        .account_info
        .as_object()
        .map_or(false, |o| !o.is_empty())
    {
        let account = serde_json::to_string_pretty(&data.live.account_info)
            .unwrap_or_else(|_| "{}".into());
        let _ = writeln!(html, "        <div class=\"section\">");
        let _ = writeln!(html, "            <h2>🧾 Mint Account</h2>");
        let _ = writeln!(
            html,
            "            <div class=\"log-container\">{}</div>",
            escape_html(&account)
        );
        let _ = writeln!(html, "        </div>");
    }

    let _ = writeln!(html, "    </div>");
    let _ = writeln!(html, "</div>");
    let _ = writeln!(html, "</body>");
    let _ = writeln!(html, "</html>");

    html
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINT: &str = "So11111111111111111111111111111111111111112";
    const GENERATED: &str = "2024-01-01 12:00:00 UTC";

    fn data(network: Network) -> ReportData {
        ReportData {
            mint_address: MINT.to_string(),
            network,
            wallet_address: None,
            metadata: Map::new(),
            live: LiveInfo::default(),
            creation_log: None,
        }
    }

    fn metadata() -> Map<String, Value> {
        match serde_json::json!({
            "name": "Test",
            "symbol": "TST",
            "description": "A <test> token",
            "image": "https://example.com/logo.png",
            "mint": MINT,
            "decimals": 6,
            "created_at": "2024-01-01T00:00:00Z",
            "network": "devnet"
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_missing_metadata_renders_fallbacks() {
        let html = render_html(&data(Network::Devnet), GENERATED);

        assert!(html.contains("<p><strong>Name:</strong> N/A</p>"));
        assert!(html.contains("<p><strong>Symbol:</strong> N/A</p>"));
        assert!(html.contains("<p><strong>Decimals:</strong> N/A</p>"));
        assert!(html.contains("<p><strong>Created:</strong> N/A</p>"));
        assert!(html.contains("<p><strong>Supply:</strong> Unknown</p>"));
        assert!(html.contains("Token Creation Report - Unknown Token"));
        assert!(html.contains(LOG_UNAVAILABLE));
        assert!(html.contains("Incomplete"));
        assert!(!html.contains("Token Image"));
        assert!(!html.contains("Creator Wallet"));
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn test_explorer_links() {
        let html = render_html(&data(Network::Mainnet), GENERATED);
        assert!(html.contains(&format!(
            "href=\"https://explorer.solana.com/address/{}\"",
            MINT
        )));

        let html = render_html(&data(Network::Devnet), GENERATED);
        assert!(html.contains(&format!(
            "href=\"https://explorer.solana.com/address/{}?cluster=devnet\"",
            MINT
        )));
    }

    #[test]
    fn test_full_report() {
        let mut report = data(Network::Devnet);
        report.metadata = metadata();
        report.wallet_address = Some("11111111111111111111111111111111".to_string());
        report.live.supply = "500".to_string();
        report.creation_log = Some(format!(
            "[2024-01-01 00:00:00] Token mint created: {}\n[2024-01-01 00:00:05] {}\n",
            MINT, COMPLETION_MESSAGE
        ));

        let html = render_html(&report, GENERATED);

        assert!(html.contains("<h1>🪙 Test</h1>"));
        assert!(html.contains("<p><strong>Decimals:</strong> 6</p>"));
        assert!(html.contains("A &lt;test&gt; token"));
        assert!(html.contains("Created Successfully"));
        assert!(html.contains("Creator Wallet"));
        assert!(html.contains("<img src=\"https://example.com/logo.png\""));
        assert!(html.contains("Generated on 2024-01-01 12:00:00 UTC"));
        assert!(html.contains("&quot;symbol&quot;: &quot;TST&quot;"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let mut report = data(Network::Devnet);
        report.metadata = metadata();
        assert_eq!(
            render_html(&report, GENERATED),
            render_html(&report, GENERATED)
        );
    }

    #[test]
    fn test_completion_of_another_mint_is_incomplete() {
        let mut report = data(Network::Devnet);
        report.creation_log = Some(format!(
            "[2024-01-01 00:00:00] Token mint created: TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA\n[2024-01-01 00:00:05] {}\n",
            COMPLETION_MESSAGE
        ));

        assert!(!report.is_complete());
        assert!(render_html(&report, GENERATED).contains("Incomplete"));
    }

    #[test]
    fn test_log_is_escaped() {
        let mut report = data(Network::Devnet);
        report.creation_log = Some("Output: <script>alert(1)</script>".to_string());

        let html = render_html(&report, GENERATED);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("\"x\" 'y'"), "&quot;x&quot; &#39;y&#39;");
        assert_eq!(escape_html("plain"), "plain");
    }
}
