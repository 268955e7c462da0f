use super::{no_data_message, TableRow, COLUMNS};

pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// The table contents, replaced wholesale on every render. An empty row set
// yields only the no-data row, no header.
pub fn table_markup(rows: &[TableRow], filter_needle: &str) -> String {
    let mut out = String::new();

    if rows.is_empty() {
        out.push_str(&format!(
            "<tr><td colspan=\"5\">{}</td></tr>\n",
            no_data_message(&escape_html(filter_needle))
        ));
        return out;
    }

    out.push_str("<tr>");
    for column in COLUMNS {
        out.push_str(&format!("<th>{}</th>", escape_html(column)));
    }
    out.push_str("</tr>\n");

    for row in rows {
        out.push_str("<tr>");
        for value in row.cells() {
            out.push_str(&format!("<td>{}</td>", escape_html(value)));
        }
        out.push_str("</tr>\n");
    }

    out
}

pub fn render_html(rows: &[TableRow], filter_needle: &str) -> Vec<u8> {
    let table = table_markup(rows, filter_needle);

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>Student Nationality Statistics</title>
  <style>
    body {{ font-family: sans-serif; margin: 2rem; color: #0f172a; }}
    h1 {{ font-size: 1.5rem; }}
    table {{ border-collapse: collapse; width: 100%; }}
    th, td {{ border: 1px solid #cbd5e1; padding: 0.5rem 0.75rem; text-align: left; }}
    th {{ background: #f1f5f9; }}
    tr:nth-child(even) td {{ background: #f8fafc; }}
  </style>
</head>
<body>
  <h1>Student Nationality Statistics</h1>
  <table id="student-table">
{table}  </table>
</body>
</html>
"#
    );
    html.into_bytes()
}
