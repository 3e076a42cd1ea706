// HTML 页面渲染
// 表单和扫描结果共用一个页面，result 为空时只显示上传表单

use uploadscan_core::{KeywordScan, RiskTier, ScanResult};

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Upload Scanner</title>
<link rel="stylesheet" href="/static/style.css">
</head>
<body>
<main>
<h1>Upload Scanner</h1>
<form method="post" action="/" enctype="multipart/form-data">
<input type="file" name="file" required>
<button type="submit">Scan</button>
</form>
"#;

const PAGE_TAIL: &str = "</main>\n</body>\n</html>\n";

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn risk_class(risk: RiskTier) -> &'static str {
    match risk {
        RiskTier::Low => "risk-low",
        RiskTier::Medium => "risk-medium",
        RiskTier::High => "risk-high",
    }
}

fn keyword_cell(keywords: &KeywordScan) -> String {
    match keywords {
        KeywordScan::Completed { matches } if matches.is_empty() => "None".to_string(),
        KeywordScan::Completed { matches } => matches
            .iter()
            .map(|k| escape_html(k))
            .collect::<Vec<_>>()
            .join(", "),
        KeywordScan::Failed { reason } => {
            format!("<em>keyword scan unavailable ({})</em>", escape_html(reason))
        }
    }
}

/// Renders the upload page, with the result table when a scan ran.
pub fn render_page(result: Option<&ScanResult>) -> String {
    let mut html = String::from(PAGE_HEAD);

    if let Some(result) = result {
        let extension = if result.extension.is_empty() {
            "None"
        } else {
            result.extension.as_str()
        };

        let rows = [
            ("Filename", escape_html(&result.filename)),
            ("Extension", escape_html(extension)),
            ("MIME type", escape_html(&result.mime_type)),
            ("Size", format!("{} bytes", result.size)),
            ("SHA-256", format!("<code>{}</code>", result.sha256)),
            ("Keywords", keyword_cell(&result.keywords)),
            ("Score", result.score.to_string()),
        ];

        html.push_str(&format!(
            "<section class=\"result {}\">\n<h2>Risk: {}</h2>\n<table>\n",
            risk_class(result.risk),
            result.risk
        ));
        for (label, value) in rows {
            html.push_str(&format!("<tr><th>{}</th><td>{}</td></tr>\n", label, value));
        }
        html.push_str(&format!(
            "</table>\n<p class=\"meta\">Scan {} at {}</p>\n</section>\n",
            result.scan_id,
            result.scanned_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    } else {
        html.push_str("<p class=\"empty\">Choose a file to compute its hash and risk score.</p>\n");
    }

    html.push_str(PAGE_TAIL);
    html
}
