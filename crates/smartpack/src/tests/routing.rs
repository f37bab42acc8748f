use super::common::*;
use std::sync::Arc;

use axum::http::{header, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::service::PackagingService;

#[tokio::test]
async fn requests_without_a_known_session_are_unauthorized() {
    let (service, _) = disabled_service();
    let router = router_with_service(service);

    for request in [
        get("/api/products", None),
        get("/api/dashboard/stats", Some("token-mallory")),
        post_json("/api/optimize", None, &json!({ "productIds": [] })),
    ] {
        let response = router.clone().oneshot(request).await.expect("route executes");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(read_json_body(response).await, json!({ "error": "Unauthorized" }));
    }
}

#[tokio::test]
async fn products_can_be_created_and_listed() {
    let (service, _) = disabled_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/products",
            Some(TOKEN),
            &json!({
                "name": "Widget Box",
                "dimensions_length": "30",
                "dimensions_width": 20,
                "dimensions_height": 15,
                "weight": "heavy",
                "material": "Cardboard",
                "quantity": "12",
                "cost_per_unit": 10.5
            }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["product"]["dimensions_length"], json!(30.0));
    assert_eq!(payload["product"]["weight"], json!(null));
    assert_eq!(payload["product"]["quantity"], json!(12));

    let response = router
        .oneshot(get("/api/products", Some(TOKEN)))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload["products"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn upload_route_imports_csv_text() {
    let (service, _) = disabled_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/api/uploads",
            Some(TOKEN),
            &json!({
                "filename": "catalog.csv",
                "contentType": "text/csv",
                "content": "Product Name,Cost\nWidget,2.5\nGadget,3\n"
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["message"], json!("Successfully processed 2 products"));
    assert_eq!(payload["upload"]["upload_method"], json!("file"));
    assert_eq!(payload["upload"]["processed"], json!(true));
}

#[tokio::test]
async fn upload_route_rejects_other_file_types() {
    let (service, _) = disabled_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/api/uploads",
            Some(TOKEN),
            &json!({
                "filename": "catalog.pdf",
                "contentType": "application/pdf",
                "content": "%PDF-1.4"
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json_body(response).await["error"],
        json!("Invalid file type. Please upload CSV or Excel files.")
    );
}

#[tokio::test]
async fn optimize_route_validates_and_returns_flattened_records() {
    let (service, _) = disabled_service();
    let product = service.create_product(&alice(), widget_box()).expect("created");
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(post_json("/api/optimize", Some(TOKEN), &json!({})))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json_body(response).await["error"],
        json!("Product IDs are required")
    );

    let response = router
        .clone()
        .oneshot(post_json("/api/optimize", Some(TOKEN), &json!({ "productIds": [] })))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        read_json_body(response).await,
        json!({ "optimizations": [] })
    );

    let response = router
        .clone()
        .oneshot(post_json("/api/ai-optimize", Some(TOKEN), &json!({ "productIds": [] })))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        read_json_body(response).await["error"],
        json!("No products found")
    );

    let response = router
        .oneshot(post_json(
            "/api/optimize",
            Some(TOKEN),
            &json!({ "productIds": [product.id] }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let optimization = &payload["optimizations"][0];
    assert_eq!(optimization["product_name"], json!("Widget Box"));
    assert_eq!(optimization["status"], json!("completed"));
    assert_eq!(optimization["recommended_material"], json!("Optimized Cardboard"));
    assert_eq!(optimization["confidence_score"], json!(1.0));
}

#[tokio::test]
async fn malformed_json_bodies_are_bad_requests() {
    let (service, _) = disabled_service();
    let router = router_with_service(service);

    let request = axum::http::Request::post("/api/optimize")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .body(axum::body::Body::from("{not json"))
        .expect("request builds");
    let response = router.oneshot(request).await.expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(read_json_body(response).await["error"].is_string());
}

#[tokio::test]
async fn ai_routes_are_unavailable_without_a_provider() {
    let (service, _) = disabled_service();
    let product = service.create_product(&alice(), widget_box()).expect("created");
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/ai-optimize",
            Some(TOKEN),
            &json!({ "productIds": [product.id] }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        read_json_body(response).await["error"],
        json!("AI provider is not configured")
    );

    let response = router
        .oneshot(post_json(
            "/api/reports/generate",
            Some(TOKEN),
            &json!({ "reportType": "sustainability" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn ai_optimize_route_returns_camel_case_plan() {
    let (seed, store) = disabled_service();
    let product = seed.create_product(&alice(), widget_box()).expect("created");
    let advisor = ScriptedAdvisor::with_plan(plan(vec![recommendation(&product, 20.0)]));
    let router = router_with_service(PackagingService::new(store, Arc::new(advisor)));

    let response = router
        .oneshot(post_json(
            "/api/ai-optimize",
            Some(TOKEN),
            &json!({ "productIds": [product.id] }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["success"], json!(true));
    assert_eq!(payload["recommendations"][0]["costSavingsPercentage"], json!(20.0));
    assert_eq!(payload["summary"]["totalProducts"], json!(1.0));
    assert_eq!(payload["optimizations"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn advisor_failures_return_generic_errors() {
    let (seed, store) = disabled_service();
    let product = seed.create_product(&alice(), widget_box()).expect("created");
    let router = router_with_service(PackagingService::new(
        store,
        Arc::new(ScriptedAdvisor::default()),
    ));

    let response = router
        .oneshot(post_json(
            "/api/ai-optimize",
            Some(TOKEN),
            &json!({ "productIds": [product.id] }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        read_json_body(response).await["error"],
        json!("Failed to generate AI recommendations. Please try again.")
    );
}

#[tokio::test]
async fn recent_optimizations_respect_limit_and_fallback() {
    let (service, _) = disabled_service();
    let widget = service.create_product(&alice(), widget_box()).expect("created");
    let mailer = service.create_product(&alice(), mailer()).expect("created");
    service.optimize(&alice(), &[widget.id]).expect("optimized");
    service.optimize(&alice(), &[mailer.id]).expect("optimized");
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(get("/api/optimizations?limit=1", Some(TOKEN)))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload["optimizations"].as_array().map(Vec::len), Some(1));
    assert_eq!(payload["optimizations"][0]["product_name"], json!("Poly Mailer"));

    let response = router
        .oneshot(get("/api/optimizations?limit=lots", Some(TOKEN)))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload["optimizations"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn dashboard_stats_route_uses_camel_case() {
    let (service, _) = disabled_service();
    let widget = service.create_product(&alice(), widget_box()).expect("created");
    service.optimize(&alice(), &[widget.id]).expect("optimized");
    let router = router_with_service(service);

    let response = router
        .oneshot(get("/api/dashboard/stats", Some(TOKEN)))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        read_json_body(response).await,
        json!({
            "stats": {
                "totalCostSavings": 1.3,
                "avgWasteReduction": 13.0,
                "totalCo2Reduction": 1.17,
                "productCount": 1,
                "optimizationCount": 1
            }
        })
    );
}

#[tokio::test]
async fn reports_can_be_generated_and_exported() {
    let (service, _) = build_service(ScriptedAdvisor::with_report(report_content()));
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/reports/generate",
            Some(TOKEN),
            &json!({
                "reportType": "sustainability",
                "dateRange": "last-30-days",
                "sections": ["summary", "materials"],
                "reportName": "Spring Review"
            }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["report"]["executiveSummary"], json!(report_content().executive_summary));
    let report_id = payload["reportId"].clone();
    assert!(report_id.is_string());

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/reports/export",
            Some(TOKEN),
            &json!({ "reportId": report_id, "format": "csv" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
        Some("text/csv")
    );
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok()),
        Some("attachment; filename=\"Spring Review.csv\"")
    );
    let body = String::from_utf8(read_body(response).await).expect("utf8");
    assert!(body.starts_with("Metric,Value\n"));

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/reports/export",
            Some(TOKEN),
            &json!({ "reportId": report_id, "format": "pdf" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(read_body(response).await.starts_with(b"%PDF-"));

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/reports/export",
            Some(TOKEN),
            &json!({ "reportId": report_id, "format": "docx" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json_body(response).await["error"], json!("Unsupported format"));

    let response = router
        .oneshot(post_json(
            "/api/reports/export",
            Some(OTHER_TOKEN),
            &json!({ "reportId": report_id, "format": "json" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json_body(response).await["error"], json!("Report not found"));
}

#[tokio::test]
async fn store_outages_are_internal_errors() {
    let router = router_with_service(PackagingService::new(
        Arc::new(UnavailableStore),
        Arc::new(ScriptedAdvisor::default()),
    ));

    let response = router
        .oneshot(get("/api/products", Some(TOKEN)))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        read_json_body(response).await,
        json!({ "error": "Internal server error" })
    );
}
