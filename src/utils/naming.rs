/// Convert a CamelCase type name to snake_case, keeping acronym runs
/// together: `CombineOrderSKUModel` becomes `combine_order_sku_model`.
pub fn camel_to_snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev_lower = i > 0 && (chars[i - 1].is_lowercase() || chars[i - 1].is_numeric());
            let next_lower = chars.get(i + 1).map(|n| n.is_lowercase()).unwrap_or(false);
            let prev_upper = i > 0 && chars[i - 1].is_uppercase();
            if prev_lower || (prev_upper && next_lower) {
                out.push('_');
            }
            for lower in c.to_lowercase() {
                out.push(lower);
            }
        } else {
            out.push(c);
        }
    }

    out
}

/// Table name for a model within an app: `{app}_{snake_model_name}`.
///
/// Called explicitly by schema and query code; nothing derives table names
/// implicitly from type declarations.
pub fn table_name(app: &str, model: &str) -> String {
    format!("{}_{}", app, camel_to_snake(model))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_to_snake_simple() {
        assert_eq!(camel_to_snake("Note"), "note");
        assert_eq!(camel_to_snake("UserProfile"), "user_profile");
    }

    #[test]
    fn test_camel_to_snake_acronym_runs() {
        assert_eq!(
            camel_to_snake("CombineOrderSKUModel"),
            "combine_order_sku_model"
        );
        assert_eq!(camel_to_snake("HTTPResponse"), "http_response");
        assert_eq!(camel_to_snake("APIKey"), "api_key");
    }

    #[test]
    fn test_camel_to_snake_digits() {
        assert_eq!(camel_to_snake("OAuth2Token"), "o_auth2_token");
        assert_eq!(camel_to_snake("Md5Hash"), "md5_hash");
    }

    #[test]
    fn test_table_name() {
        assert_eq!(table_name("core", "Note"), "core_note");
        assert_eq!(table_name("shop", "CombineOrderSKU"), "shop_combine_order_sku");
    }
}
