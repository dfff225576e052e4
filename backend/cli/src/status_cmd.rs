//! CLI Status Command
//!
//! Queries `/api/health` of a server on localhost.

use anyhow::Result;

pub async fn run(port: u16) -> Result<()> {
    let url = format!("http://localhost:{port}/api/health");
    match reqwest::get(&url).await {
        Ok(resp) if resp.status().is_success() => {
            let body: serde_json::Value = resp.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Ok(resp) => println!("lineqr on port {port} answered {}", resp.status()),
        Err(_) => println!("lineqr is not running on port {port}"),
    }
    Ok(())
}
