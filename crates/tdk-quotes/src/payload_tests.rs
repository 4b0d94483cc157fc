use super::*;
use serde_json::json;

fn quote_body() -> Value {
    json!({
        "Global Quote": {
            "01. symbol": "IBM",
            "02. open": "182.1000",
            "03. high": "184.5000",
            "04. low": "181.2000",
            "05. price": "183.9000",
            "06. volume": "3562043",
            "07. latest trading day": "2024-05-10",
            "08. previous close": "182.0000",
            "09. change": "1.9000",
            "10. change percent": "1.0440%"
        }
    })
}

fn bar(open: &str, high: &str, low: &str, close: &str) -> Value {
    json!({
        "1. open": open,
        "2. high": high,
        "3. low": low,
        "4. close": close,
        "5. volume": "1000"
    })
}

#[test]
fn test_decode_quote() {
    let quote = decode_quote("IBM", &quote_body()).unwrap();
    assert_eq!(quote.symbol, "IBM");
    assert_eq!(quote.price, 183.9);
    assert_eq!(quote.volume, 3_562_043);
    assert_eq!(quote.previous_close, Some(182.0));
    assert!((quote.change_percent - 1.044).abs() < 1e-9);
    assert_eq!(quote.latest_trading_day.as_deref(), Some("2024-05-10"));
    assert!(quote.is_positive());
}

#[test]
fn test_invalid_credential_checked_before_other_markers() {
    let body = json!({
        "Information": "The API key you provided is invalid.",
        "Error Message": "also present"
    });
    assert_eq!(decode_quote("IBM", &body), Err(AppError::InvalidCredential));
    assert_eq!(decode_series("IBM", &body), Err(AppError::InvalidCredential));
    assert_eq!(decode_news("IBM", &body), Err(AppError::InvalidCredential));
}

#[test]
fn test_information_without_key_marker_is_not_credential_error() {
    let body = json!({"Information": "Thank you for using our service."});
    assert_eq!(
        decode_quote("IBM", &body),
        Err(AppError::SymbolNotFound("IBM".into()))
    );
}

#[test]
fn test_error_message_and_empty_body_are_symbol_not_found() {
    let expected = Err(AppError::SymbolNotFound("ZZZZ".into()));
    let error_body = json!({"Error Message": "Invalid API call."});
    assert_eq!(decode_series("ZZZZ", &error_body), expected);
    assert_eq!(decode_series("ZZZZ", &json!({})), expected);
}

#[test]
fn test_decode_quote_with_numeric_fields() {
    let body = json!({
        "Global Quote": {
            "01. symbol": "IBM",
            "02. open": 182.1,
            "03. high": 184.5,
            "04. low": 181.2,
            "05. price": 183.9,
            "06. volume": 3_562_043,
            "09. change": 1.9,
            "10. change percent": "1.0440%"
        }
    });
    let quote = decode_quote("IBM", &body).unwrap();
    assert_eq!(quote.price, 183.9);
    assert_eq!(quote.volume, 3_562_043);
}

#[test]
fn test_quote_without_price_is_symbol_not_found() {
    let body = json!({"Global Quote": {}});
    assert_eq!(
        decode_quote("ZZZZ", &body),
        Err(AppError::SymbolNotFound("ZZZZ".into()))
    );
}

#[test]
fn test_malformed_number_is_unrecognized_shape() {
    let mut body = quote_body();
    body["Global Quote"]["02. open"] = json!("n/a");
    let err = decode_quote("IBM", &body).unwrap_err();
    assert!(matches!(
        err,
        AppError::UnrecognizedShape { ref function, ref detail }
            if function == "GLOBAL_QUOTE" && detail.contains("02. open")
    ));
}

#[test]
fn test_non_object_body_is_unrecognized_shape() {
    let err = decode_news("IBM", &json!(["not", "an", "object"])).unwrap_err();
    assert!(matches!(err, AppError::UnrecognizedShape { .. }));
}

#[test]
fn test_series_sorted_ascending() {
    let body = json!({
        "Meta Data": {"2. Symbol": "IBM"},
        "Time Series (Daily)": {
            "2024-05-10": bar("3", "4", "2", "3.5"),
            "2024-05-08": bar("1", "2", "0.5", "1.5"),
            "2024-05-09": bar("2", "3", "1", "2.5")
        }
    });
    let series = decode_series("IBM", &body).unwrap();
    let dates: Vec<String> = series.bars.iter().map(|b| b.date.to_string()).collect();
    assert_eq!(dates, ["2024-05-08", "2024-05-09", "2024-05-10"]);
    assert_eq!(series.bars[2].close, 3.5);
}

#[test]
fn test_series_missing_is_symbol_not_found() {
    let body = json!({"Meta Data": {"2. Symbol": "ZZZZ"}});
    assert_eq!(
        decode_series("ZZZZ", &body),
        Err(AppError::SymbolNotFound("ZZZZ".into()))
    );
}

#[test]
fn test_series_bad_date_is_unrecognized_shape() {
    let body = json!({"Time Series (Daily)": {"yesterday": bar("1", "2", "0", "1")}});
    assert!(matches!(
        decode_series("IBM", &body),
        Err(AppError::UnrecognizedShape { .. })
    ));
}

#[test]
fn test_window_and_bounds() {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let bars: Vec<DailyBar> = (0..40)
        .map(|i| DailyBar {
            date: start + chrono::Days::new(i),
            open: 10.0,
            high: 20.0 + i as f64,
            low: 10.0 + i as f64,
            close: 15.0,
            volume: 1,
        })
        .collect();
    let series = DailySeries { bars };

    let month = series.window(TimeRange::OneMonth);
    assert_eq!(month.len(), 30);
    assert_eq!(month[0].date, start + chrono::Days::new(10));
    assert_eq!(series.window(TimeRange::OneYear).len(), 40);

    let bounds = DailySeries::bounds(month).unwrap();
    assert_eq!(bounds.min_low, 20.0);
    assert_eq!(bounds.max_high, 59.0);
    assert!((bounds.buffer - 3.9).abs() < 1e-9);
    assert!((bounds.suggested_min() - 16.1).abs() < 1e-9);
    assert!(DailySeries::bounds(&[]).is_none());
}

#[test]
fn test_news_headlines_limited_with_placeholder() {
    let feed: Vec<Value> = (0..9)
        .map(|i| {
            json!({
                "title": format!("Story {i}"),
                "summary": "s",
                "url": format!("https://news.example/{i}"),
                "banner_image": if i == 0 { Value::Null } else { json!("https://img.example/x.png") },
                "overall_sentiment_score": 0.1
            })
        })
        .collect();
    let news = decode_news("IBM", &json!({"items": "9", "feed": feed})).unwrap();
    assert_eq!(news.articles.len(), 9);
    assert_eq!(news.headlines().len(), NEWS_LIMIT);
    assert_eq!(
        news.headlines()[0].banner_or_placeholder(),
        "https://via.placeholder.com/300x160?text=No+Image"
    );
    assert_eq!(news.headlines()[1].banner_or_placeholder(), "https://img.example/x.png");
}

#[test]
fn test_news_without_feed_is_empty() {
    let news = decode_news("IBM", &json!({"items": "0"})).unwrap();
    assert!(news.headlines().is_empty());
}
