use anyhow::Result;
use minirag_vector_store::{RagConfig, SearchResult};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct QueryReport<'a> {
    pub query: &'a str,
    pub top_n: usize,
    pub embedding_model: &'a str,
    pub records: usize,
    pub results: &'a [SearchResult],
}

pub fn print_query(report: &QueryReport<'_>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    if report.results.is_empty() {
        println!("No matching chunks ({} stored).", report.records);
        return Ok(());
    }
    println!("Retrieved knowledge:");
    for hit in report.results {
        println!(" - (similarity: {:.2}) {}", hit.score, hit.text);
    }
    Ok(())
}

pub fn print_config(config: &RagConfig, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }

    println!("embedding_model: {}", config.embedding_model);
    println!("language_model:  {}", config.language_model);
    println!("embedding_mode:  {}", config.embedding_mode.as_str());
    println!("ollama_host:     {}", config.ollama_host);
    println!("request_timeout: {}s", config.request_timeout_secs);
    println!("stub_dimension:  {}", config.stub_dimension);
    Ok(())
}
