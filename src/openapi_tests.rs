#[cfg(test)]
mod tests {
    use crate::schemas::ApiDoc;
    use utoipa::OpenApi;
    use utoipa::openapi::PathItemType;

    fn object_properties(name: &str) -> Vec<String> {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.as_ref().unwrap();
        let schema = components.schemas.get(name).unwrap();

        if let utoipa::openapi::RefOr::T(utoipa::openapi::schema::Schema::Object(obj)) = schema {
            obj.properties.keys().cloned().collect()
        } else {
            panic!("{} should be an object schema", name);
        }
    }

    #[test]
    fn test_openapi_schema_generation() {
        let openapi = ApiDoc::openapi();

        assert!(openapi.components.is_some());
        let components = openapi.components.as_ref().unwrap();

        for name in [
            "ErrorResponse",
            "HealthResponse",
            "TickerOptions",
            "PriceRecord",
            "PriceHistoryResponse",
            "ForecastPoint",
            "ForecastResponse",
            "CacheClearResponse",
        ] {
            assert!(components.schemas.contains_key(name), "missing schema {}", name);
        }

        assert!(serde_json::to_string(&openapi).is_ok());
    }

    #[test]
    fn test_error_response_schema_structure() {
        let properties = object_properties("ErrorResponse");
        for field in ["error", "code", "success"] {
            assert!(properties.contains(&field.to_string()));
        }
    }

    #[test]
    fn test_forecast_point_schema_lists_components() {
        let properties = object_properties("ForecastPoint");
        for field in [
            "ds",
            "trend",
            "trend_lower",
            "trend_upper",
            "weekly",
            "yearly",
            "additive_terms",
            "yhat_lower",
            "yhat_upper",
            "yhat",
        ] {
            assert!(properties.contains(&field.to_string()), "missing {}", field);
        }
    }

    #[test]
    fn test_openapi_paths() {
        let openapi = ApiDoc::openapi();
        let paths = &openapi.paths.paths;

        let expected = [
            ("/health", PathItemType::Get),
            ("/api/v1/tickers", PathItemType::Get),
            ("/api/v1/tickers/{ticker}/prices", PathItemType::Get),
            ("/api/v1/tickers/{ticker}/forecast", PathItemType::Get),
            ("/api/v1/cache/clear", PathItemType::Post),
        ];
        for (path, method) in expected {
            let item = paths.get(path).unwrap_or_else(|| panic!("missing path {}", path));
            assert!(item.operations.contains_key(&method), "missing method on {}", path);
        }
    }

    #[test]
    fn test_forecast_endpoint_documents_error_statuses() {
        let openapi = ApiDoc::openapi();
        let forecast = openapi
            .paths
            .paths
            .get("/api/v1/tickers/{ticker}/forecast")
            .unwrap();
        let operation = forecast.operations.get(&PathItemType::Get).unwrap();

        for status in ["200", "400", "404", "422", "500", "502"] {
            assert!(operation.responses.responses.contains_key(status));
        }

        let parameters: Vec<String> = operation
            .parameters
            .as_ref()
            .unwrap()
            .iter()
            .map(|p| p.name.clone())
            .collect();
        assert!(parameters.contains(&"ticker".to_string()));
        assert!(parameters.contains(&"years".to_string()));
        assert!(parameters.contains(&"tail".to_string()));
    }

    #[test]
    fn test_all_error_responses_reference_correct_schema() {
        let openapi = ApiDoc::openapi();
        let openapi_json = serde_json::to_string(&openapi).unwrap();

        assert!(!openapi_json.contains("crate.schemas.ErrorResponse"));
        assert!(!openapi_json.contains("crate::schemas::ErrorResponse"));
        assert!(openapi_json.contains("ErrorResponse"));
    }
}
