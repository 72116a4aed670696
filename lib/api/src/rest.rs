use actix_cors::Cors;
use actix_multipart::Multipart;
use actix_web::http::header;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use futures_util::StreamExt;
use lexitag_core::{
    apply_classifier, apply_scorer, filter_by_label, Column, DictionarySet, SentimentDictionary,
    SentimentLabel, Table,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

const SENTIMENT_FILENAME: &str = "sentiment_analysis_results.csv";
const CLASSIFY_FILENAME: &str = "classified_data.csv";

/// Dictionaries used when a request does not bring its own.
///
/// Read-only once the server starts.
#[derive(Debug, Clone, Default)]
pub struct AnalysisDefaults {
    pub sentiment: SentimentDictionary,
    pub dictionaries: DictionarySet,
}

#[derive(Serialize)]
struct DatasetInfo<'a> {
    rows: usize,
    columns: &'a [Column],
    text_columns: Vec<&'a str>,
}

/// Parts of a `multipart/form-data` upload
#[derive(Default)]
struct UploadForm {
    file: Option<Vec<u8>>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }
}

pub struct RestApi;

impl RestApi {
    pub async fn start(defaults: Arc<AnalysisDefaults>, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(defaults.clone()))
                .configure(configure)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

/// Register every route; shared by the server and the tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/dictionaries", web::get().to(list_dictionaries))
        .route("/sentiment/dictionary", web::get().to(get_sentiment_dictionary))
        .route("/datasets/inspect", web::post().to(inspect_dataset))
        .route("/sentiment", web::post().to(analyze_sentiment))
        .route("/classify", web::post().to(classify));
}

fn bad_request(message: impl ToString) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "error": message.to_string()
    }))
}

fn csv_attachment(table: &Table, filename: &str) -> HttpResponse {
    match table.to_csv_string() {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ))
            .body(csv),
        Err(e) => bad_request(e),
    }
}

async fn read_form(mut payload: Multipart) -> ActixResult<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let name = field.name().unwrap_or_default().to_string();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            bytes.extend_from_slice(&chunk?);
        }

        if name == "file" {
            form.file = Some(bytes);
        } else {
            form.fields.insert(name, String::from_utf8_lossy(&bytes).into_owned());
        }
    }

    Ok(form)
}

/// Parse the uploaded dataset and resolve the text column to analyze
fn load_upload(form: &UploadForm) -> Result<(Table, String), HttpResponse> {
    let bytes = form
        .file
        .as_deref()
        .ok_or_else(|| bad_request("Missing 'file' field"))?;
    let column = form
        .field("column")
        .ok_or_else(|| bad_request("Missing 'column' field"))?;

    let table = Table::from_csv_bytes(bytes)
        .map_err(|e| bad_request(format!("Error reading file: {}", e)))?;
    table.require_text_columns().map_err(bad_request)?;

    Ok((table, column.to_string()))
}

async fn list_dictionaries(
    defaults: web::Data<Arc<AnalysisDefaults>>,
) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(&defaults.dictionaries))
}

async fn get_sentiment_dictionary(
    defaults: web::Data<Arc<AnalysisDefaults>>,
) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(defaults.sentiment.to_terms()))
}

async fn inspect_dataset(payload: Multipart) -> ActixResult<HttpResponse> {
    let form = read_form(payload).await?;
    let bytes = match form.file.as_deref() {
        Some(bytes) => bytes,
        None => return Ok(bad_request("Missing 'file' field")),
    };

    let table = match Table::from_csv_bytes(bytes) {
        Ok(table) => table,
        Err(e) => return Ok(bad_request(format!("Error reading file: {}", e))),
    };
    let text_columns = match table.require_text_columns() {
        Ok(columns) => columns,
        Err(e) => return Ok(bad_request(e)),
    };

    Ok(HttpResponse::Ok().json(DatasetInfo {
        rows: table.len(),
        columns: table.columns(),
        text_columns,
    }))
}

async fn analyze_sentiment(
    defaults: web::Data<Arc<AnalysisDefaults>>,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let form = read_form(payload).await?;
    let (table, column) = match load_upload(&form) {
        Ok(upload) => upload,
        Err(response) => return Ok(response),
    };

    let label = match form.field("label").map(str::parse::<SentimentLabel>).transpose() {
        Ok(label) => label,
        Err(e) => return Ok(bad_request(e)),
    };

    let custom;
    let dictionary = match form.field("dictionary") {
        Some(text) => {
            custom = SentimentDictionary::parse(text);
            &custom
        }
        None => &defaults.sentiment,
    };
    debug!(
        positive = dictionary.positive_count(),
        negative = dictionary.negative_count(),
        "Scoring upload"
    );

    let scored = match apply_scorer(&table, &column, dictionary) {
        Ok(scored) => scored,
        Err(e) => return Ok(bad_request(e)),
    };
    let scored = match label {
        Some(label) => match filter_by_label(&scored, label) {
            Ok(filtered) => filtered,
            Err(e) => return Ok(bad_request(e)),
        },
        None => scored,
    };

    Ok(csv_attachment(&scored, SENTIMENT_FILENAME))
}

async fn classify(
    defaults: web::Data<Arc<AnalysisDefaults>>,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let form = read_form(payload).await?;
    let (table, column) = match load_upload(&form) {
        Ok(upload) => upload,
        Err(response) => return Ok(response),
    };

    let custom;
    let dictionaries = match form.field("dictionaries") {
        Some(json) => match DictionarySet::from_json(json) {
            Ok(set) => {
                custom = set;
                &custom
            }
            Err(e) => return Ok(bad_request(e)),
        },
        None => &defaults.dictionaries,
    };
    debug!(dictionaries = dictionaries.len(), "Classifying upload");

    match apply_classifier(&table, &column, dictionaries) {
        Ok(classified) => Ok(csv_attachment(&classified, CLASSIFY_FILENAME)),
        Err(e) => Ok(bad_request(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};

    const BOUNDARY: &str = "lexitag-test-boundary";

    fn multipart(parts: &[(&str, &str)]) -> (String, String) {
        let mut body = String::new();
        for (name, value) in parts {
            body.push_str(&format!("--{}\r\n", BOUNDARY));
            if *name == "file" {
                body.push_str(
                    "Content-Disposition: form-data; name=\"file\"; filename=\"data.csv\"\r\n\
                     Content-Type: text/csv\r\n",
                );
            } else {
                body.push_str(&format!("Content-Disposition: form-data; name=\"{}\"\r\n", name));
            }
            body.push_str("\r\n");
            body.push_str(value);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{}--\r\n", BOUNDARY));
        (format!("multipart/form-data; boundary={}", BOUNDARY), body)
    }

    fn post(uri: &str, parts: &[(&str, &str)]) -> actix_web::test::TestRequest {
        let (content_type, body) = multipart(parts);
        test::TestRequest::post()
            .uri(uri)
            .insert_header((header::CONTENT_TYPE, content_type))
            .set_payload(body)
    }

    macro_rules! app {
        () => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(Arc::new(AnalysisDefaults::default())))
                    .configure(configure),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_list_dictionaries() {
        let app = app!();
        let req = test::TestRequest::get().uri("/dictionaries").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["urgency_marketing"].as_array().unwrap().len(), 17);
        assert_eq!(body["exclusive_marketing"].as_array().unwrap().len(), 15);
    }

    #[actix_web::test]
    async fn test_sentiment_dictionary() {
        let app = app!();
        let req = test::TestRequest::get().uri("/sentiment/dictionary").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["positive"].as_array().unwrap().len(), 15);
        assert_eq!(body["negative"][0], "angry");
    }

    #[actix_web::test]
    async fn test_inspect_dataset() {
        let app = app!();
        let req = post("/datasets/inspect", &[("file", "id,text\n1,hello\n2,world\n")]).to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["rows"], 2);
        assert_eq!(body["text_columns"], serde_json::json!(["text"]));
        assert_eq!(body["columns"][0]["kind"], "integer");
    }

    #[actix_web::test]
    async fn test_inspect_without_text_columns() {
        let app = app!();
        let req = post("/datasets/inspect", &[("file", "a,b\n1,2\n")]).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_sentiment_upload() {
        let app = app!();
        let req = post(
            "/sentiment",
            &[
                ("file", "id,text\n1,good good bad\n2,nothing\n"),
                ("column", "text"),
                ("dictionary", "good,positive\nbad,negative"),
            ],
        )
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .contains(SENTIMENT_FILENAME));

        let body = test::read_body(resp).await;
        let csv = std::str::from_utf8(&body).unwrap();
        assert_eq!(
            csv,
            "id,text,sentiment_score,sentiment_label\n\
             1,good good bad,0.3333333333333333,Positive\n\
             2,nothing,0.0,Neutral\n"
        );
    }

    #[actix_web::test]
    async fn test_sentiment_label_filter() {
        let app = app!();
        let req = post(
            "/sentiment",
            &[
                ("file", "text\ngood\nawful\nplain\n"),
                ("column", "text"),
                ("label", "negative"),
            ],
        )
        .to_request();
        let body = test::call_and_read_body(&app, req).await;
        let csv = std::str::from_utf8(&body).unwrap();
        assert_eq!(csv, "text,sentiment_score,sentiment_label\nawful,-1.0,Negative\n");
    }

    #[actix_web::test]
    async fn test_classify_upload() {
        let app = app!();
        let req = post(
            "/classify",
            &[
                ("file", "ID,Statement\n1,Exclusive deal for VIP members\n"),
                ("column", "Statement"),
                ("dictionaries", r#"{"vip": ["VIP"]}"#),
            ],
        )
        .to_request();
        let body = test::call_and_read_body(&app, req).await;
        let csv = std::str::from_utf8(&body).unwrap();
        assert_eq!(
            csv,
            "ID,Statement,vip_count,vip_present,vip_matches\n\
             1,Exclusive deal for VIP members,1,True,vip\n"
        );
    }

    #[actix_web::test]
    async fn test_errors_are_bad_requests() {
        let app = app!();

        let cases: Vec<(&str, Vec<(&str, &str)>)> = vec![
            ("/sentiment", vec![("column", "text")]),
            ("/sentiment", vec![("file", "text\nhi\n")]),
            ("/sentiment", vec![("file", "text\nhi\n"), ("column", "missing")]),
            ("/sentiment", vec![("file", "a,b\n1,2\n1,2,3\n"), ("column", "a")]),
            ("/sentiment", vec![("file", "text\nhi\n"), ("column", "text"), ("label", "mixed")]),
            ("/classify", vec![("file", "text\nhi\n"), ("column", "text"), ("dictionaries", "[")]),
        ];

        for (uri, parts) in cases {
            let resp = test::call_service(&app, post(uri, &parts).to_request()).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{} {:?}", uri, parts);
            let body: serde_json::Value = test::read_body_json(resp).await;
            assert!(body["error"].is_string());
        }
    }
}
