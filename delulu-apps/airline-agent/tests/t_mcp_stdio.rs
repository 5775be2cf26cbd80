//!  Delulu Airline Agent
//!
//!  Copyright (C) 2026  Mamy Ratsimbazafy
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! MCP server integration tests using subprocess with stdio transport.
//!
//! Drives the real `delulu-airline-mcp` binary with newline-delimited JSON-RPC.
//!
//! Run with:
//!     cargo test --test t_mcp_stdio

#![cfg(feature = "mcp")]

use anyhow::{Context, Result, bail};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(10);

const TOOL_NAMES: [&str; 7] = [
    "fetch_flight_info",
    "pick_flight",
    "book_flight",
    "fetch_itinerary",
    "cancel_itinerary",
    "get_user_info",
    "file_ticket",
];

fn load_schema_from_file(name: &str) -> Result<Value> {
    let schema_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("schemas")
        .join(name);
    let content = std::fs::read_to_string(&schema_path)
        .context(format!("Failed to read schema file: {:?}", schema_path))?;
    serde_json::from_str(&content)
        .context(format!("Failed to parse schema file: {:?}", schema_path))
}

fn validate_json_schema(instance: &Value, schema: &Value, schema_name: &str) -> Result<()> {
    let validator = jsonschema::Validator::new(schema)
        .context(format!("Failed to create validator for {}", schema_name))?;

    let errors: Vec<String> = validator
        .iter_errors(instance)
        .map(|e| format!("{}: {}", schema_name, e))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        bail!(
            "Schema validation failed for {}:\n{}",
            schema_name,
            errors.join("\n")
        )
    }
}

struct McpSession {
    _child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    next_id: u64,
}

impl McpSession {
    async fn start() -> Result<Self> {
        let mut child = Command::new(env!("CARGO_BIN_EXE_delulu-airline-mcp"))
            .arg("stdio")
            .env("RUST_LOG", "warn")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .context("Failed to spawn delulu-airline-mcp")?;

        let stdin = child.stdin.take().context("No stdin")?;
        let stdout = BufReader::new(child.stdout.take().context("No stdout")?);
        let mut session = Self {
            _child: child,
            stdin,
            stdout,
            next_id: 1,
        };

        let init = session
            .request(
                "initialize",
                json!({
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": {"name": "test-client", "version": "1.0"}
                }),
            )
            .await?;
        assert!(
            init.get("serverInfo").is_some(),
            "Should get server info in init response: {}",
            init
        );
        session
            .send(&json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
            .await?;
        Ok(session)
    }

    async fn send(&mut self, message: &Value) -> Result<()> {
        let mut line = message.to_string();
        line.push('\n');
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.flush().await?;
        Ok(())
    }

    /// Send a request and wait for the response carrying the same id
    async fn request(&mut self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id;
        self.next_id += 1;
        self.send(&json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params}))
            .await?;

        loop {
            let mut line = String::new();
            let n = tokio::time::timeout(TIMEOUT, self.stdout.read_line(&mut line))
                .await
                .context("Timed out waiting for response")??;
            if n == 0 {
                bail!("Server closed stdout while waiting for {}", method);
            }
            let message: Value = serde_json::from_str(line.trim())
                .context(format!("Not JSON: {}", line))?;
            if message.get("id").and_then(Value::as_u64) != Some(id) {
                continue;
            }
            if let Some(error) = message.get("error") {
                bail!("JSON-RPC error for {}: {}", method, error);
            }
            return message
                .get("result")
                .cloned()
                .context("Response without result");
        }
    }

    /// Call a tool, returning (is_error, text payload)
    async fn call_tool(&mut self, name: &str, args: Value) -> Result<(bool, String)> {
        let result = self
            .request("tools/call", json!({"name": name, "arguments": args}))
            .await?;
        let is_error = result
            .get("isError")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let text = result["content"][0]["text"]
            .as_str()
            .context(format!("No text content in {}", result))?
            .to_string();
        Ok((is_error, text))
    }

    async fn call_tool_json(&mut self, name: &str, args: Value) -> Result<Value> {
        let (is_error, text) = self.call_tool(name, args).await?;
        if is_error {
            bail!("{} failed: {}", name, text);
        }
        serde_json::from_str(&text).context(format!("{} returned non-JSON: {}", name, text))
    }
}

#[tokio::test]
async fn test_mcp_help_output() -> Result<()> {
    let output = Command::new(env!("CARGO_BIN_EXE_delulu-airline-mcp"))
        .arg("--help")
        .output()
        .await?;

    assert!(output.status.success(), "Help should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("delulu-airline-mcp"), "Help should show binary name");
    assert!(stdout.contains("stdio"), "Help should show stdio command");
    assert!(stdout.contains("http"), "Help should show http command");
    assert!(stdout.contains("--seed"), "Help should show seed option");
    Ok(())
}

#[tokio::test]
async fn test_mcp_lists_all_tools() -> Result<()> {
    let mut session = McpSession::start().await?;
    let result = session.request("tools/list", json!({})).await?;
    let tools = result["tools"].as_array().context("tools array")?;

    let mut names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
    names.sort_unstable();
    let mut expected = TOOL_NAMES.to_vec();
    expected.sort_unstable();
    assert_eq!(names, expected);

    for tool in tools {
        let schema = &tool["inputSchema"];
        assert!(
            jsonschema::Validator::new(schema).is_ok(),
            "Tool {} has an unusable input schema: {}",
            tool["name"],
            schema
        );
    }
    Ok(())
}

#[tokio::test]
async fn test_mcp_booking_scenario() -> Result<()> {
    let mut session = McpSession::start().await?;

    let adam = session
        .call_tool_json("get_user_info", json!({"name": "Adam"}))
        .await?;
    assert_eq!(adam["user_id"], "1");

    let flights = session
        .call_tool_json(
            "fetch_flight_info",
            json!({
                "date": {"year": 2025, "month": 9, "day": 1},
                "origin": "SFO",
                "destination": "JFK"
            }),
        )
        .await?;
    let ids: Vec<&str> = flights
        .as_array()
        .context("flight list")?
        .iter()
        .filter_map(|f| f["flight_id"].as_str())
        .collect();
    assert_eq!(ids, ["DA123", "DA125"]);

    let best = session
        .call_tool_json("pick_flight", json!({"flights": flights}))
        .await?;
    assert_eq!(best["flight_id"], "DA123");

    let booking = session
        .call_tool_json("book_flight", json!({"flight": best, "user_profile": adam}))
        .await?;
    validate_json_schema(
        &booking,
        &load_schema_from_file("book-flight-response.json")?,
        "book_flight response",
    )?;
    let cn = booking["confirmation_number"]
        .as_str()
        .context("confirmation number")?
        .to_string();

    let fetched = session
        .call_tool_json("fetch_itinerary", json!({"confirmation_number": cn}))
        .await?;
    assert_eq!(fetched, booking["itinerary"]);

    let bob = session
        .call_tool_json("get_user_info", json!({"name": "Bob"}))
        .await?;
    let (is_error, text) = session
        .call_tool(
            "cancel_itinerary",
            json!({"confirmation_number": cn, "user_profile": bob}),
        )
        .await?;
    assert!(is_error, "Bob must not cancel Adam's itinerary");
    assert!(text.starts_with("Unauthorized"), "{}", text);

    // Adam's user_id under another name and email is not Adam
    let (is_error, text) = session
        .call_tool(
            "cancel_itinerary",
            json!({
                "confirmation_number": cn,
                "user_profile": {"user_id": "1", "name": "Mallory", "email": "evil@x"}
            }),
        )
        .await?;
    assert!(is_error, "A forged profile must not cancel Adam's itinerary");
    assert!(text.starts_with("InvalidArgument"), "{}", text);
    let still_booked = session
        .call_tool_json("fetch_itinerary", json!({"confirmation_number": cn}))
        .await?;
    assert_eq!(still_booked, booking["itinerary"]);

    let cancelled = session
        .call_tool_json(
            "cancel_itinerary",
            json!({"confirmation_number": cn, "user_profile": adam}),
        )
        .await?;
    assert_eq!(cancelled["status"], "cancelled");

    let gone = session
        .call_tool_json("fetch_itinerary", json!({"confirmation_number": cn}))
        .await?;
    assert!(gone.is_null());

    let (is_error, text) = session
        .call_tool(
            "cancel_itinerary",
            json!({"confirmation_number": cn, "user_profile": adam}),
        )
        .await?;
    assert!(is_error);
    assert!(text.starts_with("NotFound"), "{}", text);

    let ticket = session
        .call_tool_json(
            "file_ticket",
            json!({"user_request": "Need a wheelchair at JFK", "user_profile": adam}),
        )
        .await?;
    let ticket_id = ticket["ticket_id"].as_str().context("ticket id")?;
    assert_eq!(ticket_id.len(), 6);
    Ok(())
}

#[tokio::test]
async fn test_mcp_error_kinds() -> Result<()> {
    let mut session = McpSession::start().await?;

    let (is_error, text) = session
        .call_tool(
            "fetch_flight_info",
            json!({
                "date": {"year": 2025, "month": 9, "day": 2, "hour": 0},
                "origin": "SFO",
                "destination": "JFK"
            }),
        )
        .await?;
    assert!(is_error);
    assert!(text.starts_with("NotFound"), "{}", text);

    let (is_error, text) = session
        .call_tool("pick_flight", json!({"flights": []}))
        .await?;
    assert!(is_error);
    assert!(text.starts_with("InvalidArgument"), "{}", text);

    let nobody = session
        .call_tool_json("get_user_info", json!({"name": "Eve"}))
        .await?;
    assert!(nobody.is_null());

    let (is_error, text) = session
        .call_tool(
            "file_ticket",
            json!({
                "user_request": "hello",
                "user_profile": {"user_id": "", "name": "Ghost", "email": ""}
            }),
        )
        .await?;
    assert!(is_error);
    assert!(text.starts_with("InvalidArgument"), "{}", text);
    Ok(())
}

#[tokio::test]
async fn test_mcp_rejects_unknown_flight_and_user() -> Result<()> {
    let mut session = McpSession::start().await?;

    let adam = session
        .call_tool_json("get_user_info", json!({"name": "Adam"}))
        .await?;
    let flights = session
        .call_tool_json(
            "fetch_flight_info",
            json!({
                "date": {"year": 2025, "month": 9, "day": 1},
                "origin": "SFO",
                "destination": "JFK"
            }),
        )
        .await?;
    let da123 = flights[0].clone();
    assert_eq!(da123["flight_id"], "DA123");

    let made_up_flight = json!({
        "flight_id": "XX999",
        "origin": "SFO",
        "destination": "JFK",
        "date_time": {"year": 2025, "month": 9, "day": 1, "hour": 1},
        "duration": 1,
        "price": 1
    });
    let mallory = json!({"user_id": "999", "name": "Mallory", "email": "mallory@example.com"});

    let (is_error, text) = session
        .call_tool(
            "book_flight",
            json!({"flight": made_up_flight, "user_profile": mallory}),
        )
        .await?;
    assert!(is_error, "Unknown flight must not be booked: {}", text);
    assert!(text.starts_with("NotFound"), "{}", text);

    let (is_error, text) = session
        .call_tool(
            "book_flight",
            json!({"flight": made_up_flight, "user_profile": adam}),
        )
        .await?;
    assert!(is_error);
    assert!(text.starts_with("NotFound"), "{}", text);

    let mut discounted = da123.clone();
    discounted["price"] = json!(1);
    let (is_error, text) = session
        .call_tool(
            "book_flight",
            json!({"flight": discounted, "user_profile": adam}),
        )
        .await?;
    assert!(is_error, "Altered catalog flight must not be booked: {}", text);
    assert!(text.starts_with("InvalidArgument"), "{}", text);

    let (is_error, text) = session
        .call_tool(
            "book_flight",
            json!({"flight": da123, "user_profile": mallory}),
        )
        .await?;
    assert!(is_error, "Unknown user must not book: {}", text);
    assert!(text.starts_with("NotFound"), "{}", text);

    let (is_error, text) = session
        .call_tool(
            "file_ticket",
            json!({"user_request": "refund please", "user_profile": mallory}),
        )
        .await?;
    assert!(is_error);
    assert!(text.starts_with("NotFound"), "{}", text);

    let booking = session
        .call_tool_json("book_flight", json!({"flight": da123, "user_profile": adam}))
        .await?;
    assert_eq!(booking["itinerary"]["flight"], da123);
    Ok(())
}
