//! Single-question handler

use crate::cli::output::print_query_result;
use crate::AppConfig;
use crate::Result;

pub async fn handle_ask(config: &AppConfig, question: &str, json: bool) -> Result<bool> {
    let rag = super::build_rag_service(config);
    let result = rag.query(question).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_query_result(&result);
    }

    Ok(result.success)
}
