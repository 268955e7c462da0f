use crate::fetcher::{
    build_client, fetch_envelope, records_url, DatasetEnvelope, FetchError, RecordEntry,
    StudentFields,
};
use crate::filter::{matching_records, DEFAULT_NEEDLE};
use crate::output::{
    build_rows, infer_format_from_path, no_data_message, render_json, render_text, table,
    OutputFormat,
};
use crate::runner::{Options, Runner, RunnerError};

fn entry(colleges: Option<&str>) -> RecordEntry {
    RecordEntry {
        fields: StudentFields {
            colleges: colleges.map(str::to_string),
            ..StudentFields::default()
        },
    }
}

const SAMPLE_PAGE: &str = r#"{
  "records": [
    {"fields": {"year": "2023", "colleges": "College of IT", "the_programs": "bachelor", "nationality": "Bahraini"}},
    {"fields": {"colleges": "College of Business"}}
  ]
}"#;

#[test]
fn default_url_matches_the_portal_endpoint() {
    let url = records_url(
        crate::fetcher::API_BASE,
        crate::fetcher::DEFAULT_DATASET,
        crate::fetcher::DEFAULT_WHERE,
        crate::fetcher::DEFAULT_LIMIT,
    );
    assert_eq!(
        url,
        "https://data.gov.bh/api/explore/v2.1/catalog/datasets/01-statistics-of-students-nationalities_updated/records?where=colleges%20like%20%22IT%22%20AND%20the_programs%20like%20%22bachelor%22&limit=100"
    );
}

#[test]
fn envelope_without_records_field_decodes_to_none() {
    let envelope: DatasetEnvelope = serde_json::from_str("{}").unwrap();
    assert!(envelope.records.is_none());
}

#[test]
fn envelope_accepts_numeric_field_values() {
    let envelope: DatasetEnvelope =
        serde_json::from_str(r#"{"records": [{"fields": {"year": 2023, "semester": null}}]}"#)
            .unwrap();
    let records = envelope.records.unwrap();
    assert_eq!(records[0].fields.year.as_deref(), Some("2023"));
    assert!(records[0].fields.semester.is_none());
}

#[test]
fn envelope_tolerates_missing_fields_object() {
    let envelope: DatasetEnvelope = serde_json::from_str(r#"{"records": [{}]}"#).unwrap();
    let records = envelope.records.unwrap();
    assert!(records[0].fields.colleges.is_none());
}

#[test]
fn filter_keeps_substring_matches_in_order() {
    let records = vec![
        entry(Some("College of IT")),
        entry(Some("College of Business")),
        entry(Some("School of College of IT Studies")),
    ];
    let matched = matching_records(records, DEFAULT_NEEDLE);
    assert_eq!(matched.len(), 2);
    assert_eq!(matched[0].fields.colleges.as_deref(), Some("College of IT"));
    assert_eq!(
        matched[1].fields.colleges.as_deref(),
        Some("School of College of IT Studies")
    );
}

#[test]
fn filter_is_case_sensitive() {
    let records = vec![entry(Some("college of it"))];
    assert!(matching_records(records, DEFAULT_NEEDLE).is_empty());
}

#[test]
fn filter_excludes_records_without_colleges() {
    let records = vec![entry(None), entry(Some("College of IT"))];
    let matched = matching_records(records, DEFAULT_NEEDLE);
    assert_eq!(matched.len(), 1);
}

#[test]
fn missing_fields_render_as_placeholder() {
    let rows = build_rows(&[entry(Some("College of IT"))]);
    assert_eq!(
        rows[0].cells(),
        ["N/A", "N/A", "N/A", "N/A", "College of IT"]
    );
}

#[test]
fn empty_string_fields_render_as_placeholder() {
    let record = RecordEntry {
        fields: StudentFields {
            year: Some(String::new()),
            colleges: Some("College of IT".to_string()),
            ..StudentFields::default()
        },
    };
    let rows = build_rows(&[record]);
    assert_eq!(
        rows[0].cells(),
        ["N/A", "N/A", "N/A", "N/A", "College of IT"]
    );
}

#[test]
fn table_markup_has_one_header_row_plus_one_row_per_record() {
    let records = vec![entry(Some("College of IT")), entry(Some("College of IT"))];
    let rows = build_rows(&records);
    let markup = table::table_markup(&rows, DEFAULT_NEEDLE);
    assert_eq!(markup.matches("<tr>").count(), 3);
    assert_eq!(markup.matches("<th>").count(), 5);
    assert!(markup.contains("<th>Year</th><th>Semester</th><th>The Programs</th><th>Nationality</th><th>Colleges</th>"));
}

#[test]
fn empty_rows_render_the_no_data_row_without_a_header() {
    let markup = table::table_markup(&[], DEFAULT_NEEDLE);
    assert_eq!(
        markup,
        "<tr><td colspan=\"5\">No data available for \"College of IT\".</td></tr>\n"
    );
}

#[test]
fn no_data_message_is_the_exact_literal() {
    assert_eq!(
        no_data_message(DEFAULT_NEEDLE),
        "No data available for \"College of IT\"."
    );
}

#[test]
fn sample_page_yields_exactly_one_data_row() {
    let envelope: DatasetEnvelope = serde_json::from_str(SAMPLE_PAGE).unwrap();
    let matched = matching_records(envelope.records.unwrap(), DEFAULT_NEEDLE);
    let rows = build_rows(&matched);
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].cells(),
        ["2023", "N/A", "bachelor", "Bahraini", "College of IT"]
    );

    let text = String::from_utf8(render_text(&rows, DEFAULT_NEEDLE)).unwrap();
    assert_eq!(text, "2023 | N/A | bachelor | Bahraini | College of IT\n");

    let markup = table::table_markup(&rows, DEFAULT_NEEDLE);
    assert!(markup
        .contains("<td>2023</td><td>N/A</td><td>bachelor</td><td>Bahraini</td><td>College of IT</td>"));
}

#[test]
fn html_document_embeds_the_student_table() {
    let rows = build_rows(&[entry(Some("College of IT"))]);
    let html = String::from_utf8(table::render_html(&rows, DEFAULT_NEEDLE)).unwrap();
    assert!(html.contains("<table id=\"student-table\">"));
    assert!(html.contains("<th>Year</th>"));
}

#[test]
fn html_cells_are_escaped() {
    let rows = build_rows(&[entry(Some("College of <IT> & \"Friends\""))]);
    let markup = table::table_markup(&rows, "College of <IT>");
    assert!(markup.contains("College of &lt;IT&gt; &amp; &quot;Friends&quot;"));
    assert!(!markup.contains("<IT>"));
}

#[test]
fn json_render_of_no_rows_is_an_empty_array() {
    assert_eq!(render_json(&[]), b"[]");
}

#[test]
fn output_format_parse_and_inference() {
    assert_eq!(OutputFormat::parse("HTML"), Some(OutputFormat::Html));
    assert_eq!(OutputFormat::parse("txt"), Some(OutputFormat::Text));
    assert_eq!(OutputFormat::parse("xml"), None);
    assert_eq!(
        infer_format_from_path("./students.html"),
        Some(OutputFormat::Html)
    );
    assert_eq!(
        infer_format_from_path("Records.JSON"),
        Some(OutputFormat::Json)
    );
    assert_eq!(infer_format_from_path("students"), None);
}

#[test]
fn runner_rejects_invalid_options() {
    let zero_limit = Options {
        limit: 0,
        ..Options::default()
    };
    assert!(matches!(
        Runner::new(zero_limit),
        Err(RunnerError::InvalidLimit { value: 0 })
    ));

    let oversized_limit = Options {
        limit: 500,
        ..Options::default()
    };
    assert!(matches!(
        Runner::new(oversized_limit),
        Err(RunnerError::InvalidLimit { value: 500 })
    ));

    let empty_dataset = Options {
        dataset: "  ".to_string(),
        ..Options::default()
    };
    assert!(matches!(
        Runner::new(empty_dataset),
        Err(RunnerError::EmptyDataset)
    ));

    let zero_timeout = Options {
        timeout_seconds: 0,
        ..Options::default()
    };
    assert!(matches!(
        Runner::new(zero_timeout),
        Err(RunnerError::InvalidTimeout)
    ));
}

// Answers one connection with the given status line, then closes.
fn serve_once(response: &'static [u8]) -> (std::net::SocketAddr, std::thread::JoinHandle<()>) {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = [0u8; 1024];
        let _ = std::io::Read::read(&mut stream, &mut buf);
        let _ = std::io::Write::write_all(&mut stream, response);
    });
    (addr, handle)
}

#[tokio::test]
async fn http_error_status_writes_no_output() {
    let (addr, server) = serve_once(
        b"HTTP/1.1 500 Internal Server Error\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
    );

    let out = std::env::temp_dir().join("studata-http-error-status.html");
    let _ = std::fs::remove_file(&out);

    let options = Options {
        api_base: format!("http://{addr}"),
        output: Some(out.to_string_lossy().to_string()),
        ..Options::default()
    };
    let runner = Runner::new(options).unwrap();
    let err = runner.run().await.unwrap_err();
    assert!(matches!(
        err,
        RunnerError::Fetch(FetchError::Status { status: 500, .. })
    ));
    assert!(!out.exists());
    server.join().unwrap();
}

#[tokio::test]
async fn malformed_body_writes_no_output() {
    let (addr, server) = serve_once(
        b"HTTP/1.1 200 OK\r\ncontent-length: 8\r\nconnection: close\r\n\r\nnot json",
    );

    let out = std::env::temp_dir().join("studata-malformed-body.html");
    let _ = std::fs::remove_file(&out);

    let options = Options {
        api_base: format!("http://{addr}"),
        output: Some(out.to_string_lossy().to_string()),
        ..Options::default()
    };
    let runner = Runner::new(options).unwrap();
    let err = runner.run().await.unwrap_err();
    assert!(matches!(err, RunnerError::Fetch(FetchError::Decode { .. })));
    assert!(!out.exists());
    server.join().unwrap();
}

#[tokio::test]
async fn connection_failure_maps_to_transport_error() {
    // Bind then drop to get a port with nothing listening on it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = build_client(5).unwrap();
    let err = fetch_envelope(&client, &format!("http://{addr}/records"))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Transport { .. }));
}
