//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Multipart bodies use a random boundary, so
//! uploads are checked part by part rather than byte for byte.

use diary_core::{ApiError, HttpMethod, HttpRequest, HttpResponse, Travel, TravelClient, TravelForm};

const BASE_URL: &str = "http://localhost:3010";
const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xD9];

fn client() -> TravelClient {
    TravelClient::new(BASE_URL).unwrap()
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn check_request(name: &str, req: &HttpRequest, expected: &serde_json::Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: url");
}

fn check_error(name: &str, err: ApiError, expected: &str) {
    let matched = match expected {
        "NotFound" => matches!(err, ApiError::NotFound),
        "Rejected" => matches!(err, ApiError::Rejected { .. }),
        "HttpError" => matches!(err, ApiError::HttpError { .. }),
        "DeserializationError" => matches!(err, ApiError::DeserializationError(_)),
        other => panic!("{name}: unknown expected_error: {other}"),
    };
    assert!(matched, "{name}: expected {expected}, got {err:?}");
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_test_vectors() {
    let raw = include_str!("../../test-vectors/list.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let user_id = case["input_user_id"].as_str().unwrap();

        let req = c.build_list_travels(user_id);
        check_request(name, &req, &case["expected_request"]);
        assert!(req.body.is_none(), "{name}: body should be None");

        let result = c.parse_list_travels(simulated(case));
        if let Some(expected_error) = case.get("expected_error") {
            check_error(name, result.unwrap_err(), expected_error.as_str().unwrap());
        } else {
            let expected: Vec<Travel> = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Create / update
// ---------------------------------------------------------------------------

#[test]
fn upload_test_vectors() {
    let raw = include_str!("../../test-vectors/upload.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let user_id = case["input_user_id"].as_str().unwrap();
        let form = TravelForm {
            title: case["input"]["title"].as_str().unwrap().to_string(),
            description: case["input"]["description"].as_str().unwrap().to_string(),
            image: JPEG.to_vec(),
        };
        let operation = case["operation"].as_str().unwrap();

        let req = match operation {
            "create" => c.build_create_travel(user_id, &form),
            "update" => c.build_update_travel(user_id, case["input_id"].as_i64().unwrap(), &form),
            other => panic!("{name}: unknown operation {other}"),
        };
        let expected_req = &case["expected_request"];
        check_request(name, &req, expected_req);

        let content_type = req.header("content-type").unwrap();
        let boundary = content_type
            .strip_prefix("multipart/form-data; boundary=")
            .unwrap_or_else(|| panic!("{name}: content-type {content_type}"));
        let body = req.body.as_deref().unwrap();
        let text = String::from_utf8_lossy(body);

        for part in expected_req["parts"].as_array().unwrap() {
            let part = part.as_array().unwrap();
            let (field, value) = (part[0].as_str().unwrap(), part[1].as_str().unwrap());
            let encoded = format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"\r\n\
Content-Type: text/plain; charset=utf-8\r\n\r\n{value}\r\n"
            );
            assert!(text.contains(&encoded), "{name}: missing part {field}");
        }
        let file_header = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"image.jpg\"\r\n\
Content-Type: image/jpeg\r\n\r\n"
        );
        assert!(text.contains(&file_header), "{name}: missing image part");
        assert!(
            body.ends_with(format!("--{boundary}--\r\n").as_bytes()),
            "{name}: unterminated form"
        );

        let response = simulated(case);
        let result = match operation {
            "create" => c.parse_create_travel(response),
            _ => c.parse_update_travel(response),
        };
        match case.get("expected_error") {
            Some(expected_error) => check_error(name, result.unwrap_err(), expected_error.as_str().unwrap()),
            None => assert!(result.is_ok(), "{name}: expected success, got {result:?}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_test_vectors() {
    let raw = include_str!("../../test-vectors/delete.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let user_id = case["input_user_id"].as_str().unwrap();
        let id = case["input_id"].as_i64().unwrap();

        let req = c.build_delete_travel(user_id, id);
        check_request(name, &req, &case["expected_request"]);
        assert!(req.body.is_none(), "{name}: body should be None");

        let result = c.parse_delete_travel(simulated(case));
        match case.get("expected_error") {
            Some(expected_error) => check_error(name, result.unwrap_err(), expected_error.as_str().unwrap()),
            None => assert!(result.is_ok(), "{name}: expected success"),
        }
    }
}
