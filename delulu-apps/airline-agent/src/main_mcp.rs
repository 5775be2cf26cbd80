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

//! # Airline Customer Service MCP Server
//!
//! Exposes the airline desk operations as MCP tools, over stdio or HTTP.

use anyhow::{Context, Error, Result};
use clap::{Parser, Subcommand};
use delulu_airline_agent::{AirlineDesk, AirlineError, Date, Flight, SeedData, UserProfile};
use rmcp::handler::server::{ServerHandler, tool::ToolRouter, wrapper::Parameters};
use rmcp::service::serve_server;
use rmcp::tool;
use rmcp::tool_router;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "delulu-airline-mcp")]
#[command(
    author,
    version,
    about = "MCP server for airline customer service (flights, itineraries, tickets)"
)]
struct Args {
    /// Seed file with users and flights (JSON). Defaults to the built-in reference set.
    #[arg(long, global = true)]
    seed: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run MCP server over stdio (for Claude Desktop, etc.)
    Stdio,

    /// Run MCP server over HTTP
    Http {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        #[arg(long, default_value = "8080")]
        port: u16,
    },
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct FetchFlightInfoInput {
    pub date: Date,
    pub origin: String,
    pub destination: String,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct PickFlightInput {
    pub flights: Vec<Flight>,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct BookFlightInput {
    pub flight: Flight,
    pub user_profile: UserProfile,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct FetchItineraryInput {
    pub confirmation_number: String,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct CancelItineraryInput {
    pub confirmation_number: String,
    pub user_profile: UserProfile,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct GetUserInfoInput {
    pub name: String,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct FileTicketInput {
    pub user_request: String,
    pub user_profile: UserProfile,
}

fn airline_error(e: AirlineError) -> String {
    format!("{}: {}", e.kind(), e)
}

fn invalid_argument(e: anyhow::Error) -> String {
    format!("InvalidArgument: {e:#}")
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

#[derive(Clone)]
pub struct AirlineAgentServer {
    desk: Arc<AirlineDesk>,
    tool_router: ToolRouter<Self>,
}

impl AirlineAgentServer {
    pub fn new(desk: Arc<AirlineDesk>) -> Self {
        Self {
            desk,
            tool_router: Self::tool_router(),
        }
    }

    /// Only profiles identical to a directory record may act on bookings and tickets
    fn resolve_user(&self, user: &UserProfile) -> Result<UserProfile, String> {
        user.validate().map_err(invalid_argument)?;
        self.desk.resolve_user(user).map_err(airline_error)
    }
}

#[tool_router]
impl AirlineAgentServer {
    #[tool(
        name = "fetch_flight_info",
        description = "Fetch flights from origin to destination on the given date. Parameters: date {year, month, day, hour (optional, ignored for matching)}, origin (airport code, exact match), destination (airport code, exact match). Fails with NotFound when no flight matches."
    )]
    async fn fetch_flight_info(
        &self,
        params: Parameters<FetchFlightInfoInput>,
    ) -> Result<String, String> {
        let input = params.0;
        let flights = self
            .desk
            .fetch_flight_info(&input.date, &input.origin, &input.destination)
            .map_err(airline_error)?;
        to_json(&flights)
    }

    #[tool(
        name = "pick_flight",
        description = "Pick the best flight among candidates: shortest duration, then cheapest price, then first in the list. Parameters: flights (non-empty list of flights as returned by fetch_flight_info)."
    )]
    async fn pick_flight(&self, params: Parameters<PickFlightInput>) -> Result<String, String> {
        let input = params.0;
        for flight in &input.flights {
            flight.validate().map_err(invalid_argument)?;
        }
        let flight = self
            .desk
            .pick_flight(&input.flights)
            .map_err(airline_error)?;
        to_json(&flight)
    }

    #[tool(
        name = "book_flight",
        description = "Book a flight on behalf of the user. Parameters: flight (a record as returned by fetch_flight_info), user_profile (as returned by get_user_info). Fails with NotFound for an unknown flight or user id, and InvalidArgument when a record differs from the stored one. Returns the confirmation_number and the itinerary."
    )]
    async fn book_flight(&self, params: Parameters<BookFlightInput>) -> Result<String, String> {
        let input = params.0;
        input.flight.validate().map_err(invalid_argument)?;
        let flight = self.desk.resolve_flight(&input.flight).map_err(airline_error)?;
        let user = self.resolve_user(&input.user_profile)?;
        let (confirmation_number, itinerary) = self
            .desk
            .book_flight(&flight, &user)
            .map_err(airline_error)?;
        to_json(&json!({
            "confirmation_number": confirmation_number,
            "itinerary": itinerary,
        }))
    }

    #[tool(
        name = "fetch_itinerary",
        description = "Fetch a booked itinerary by confirmation number. Returns null when no such itinerary exists."
    )]
    async fn fetch_itinerary(
        &self,
        params: Parameters<FetchItineraryInput>,
    ) -> Result<String, String> {
        to_json(&self.desk.fetch_itinerary(&params.0.confirmation_number))
    }

    #[tool(
        name = "cancel_itinerary",
        description = "Cancel a booked itinerary on behalf of its owner. Parameters: confirmation_number, user_profile (as returned by get_user_info, must own the itinerary). To change flights, cancel then book again: the new itinerary gets a new confirmation number."
    )]
    async fn cancel_itinerary(
        &self,
        params: Parameters<CancelItineraryInput>,
    ) -> Result<String, String> {
        let input = params.0;
        let user = self.resolve_user(&input.user_profile)?;
        let itinerary = self
            .desk
            .cancel_itinerary(&input.confirmation_number, &user)
            .map_err(airline_error)?;
        to_json(&json!({
            "status": "cancelled",
            "confirmation_number": itinerary.confirmation_number,
        }))
    }

    #[tool(
        name = "get_user_info",
        description = "Fetch the user profile with the given name (exact, case-sensitive). Returns null when the user is unknown."
    )]
    async fn get_user_info(&self, params: Parameters<GetUserInfoInput>) -> Result<String, String> {
        to_json(&self.desk.get_user_info(&params.0.name))
    }

    #[tool(
        name = "file_ticket",
        description = "File a customer support ticket for requests the agent cannot handle. Parameters: user_request (free text), user_profile (as returned by get_user_info). Returns the ticket_id."
    )]
    async fn file_ticket(&self, params: Parameters<FileTicketInput>) -> Result<String, String> {
        let input = params.0;
        let user = self.resolve_user(&input.user_profile)?;
        let ticket_id = self
            .desk
            .file_ticket(&input.user_request, &user)
            .map_err(airline_error)?;
        to_json(&json!({ "ticket_id": ticket_id }))
    }
}

impl ServerHandler for AirlineAgentServer {
    fn list_tools(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl Future<Output = Result<rmcp::model::ListToolsResult, rmcp::ErrorData>> + Send + '_
    {
        Box::pin(async move {
            let tools = self.tool_router.list_all();
            tracing::debug!("Returning {} tools", tools.len());
            Ok(rmcp::model::ListToolsResult::with_all_items(tools))
        })
    }

    fn call_tool(
        &self,
        request: rmcp::model::CallToolRequestParam,
        context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl Future<Output = Result<rmcp::model::CallToolResult, rmcp::ErrorData>> + Send + '_
    {
        tracing::debug!("call_tool: {}", request.name);
        let router = self.tool_router.clone();
        let self_clone = self.clone();
        Box::pin(async move {
            let context =
                rmcp::handler::server::tool::ToolCallContext::new(&self_clone, request, context);
            router.call(context).await
        })
    }

    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            protocol_version: rmcp::model::ProtocolVersion::V_2025_03_26,
            capabilities: rmcp::model::ServerCapabilities {
                tools: Some(rmcp::model::ToolsCapability::default()),
                ..Default::default()
            },
            server_info: rmcp::model::Implementation::from_build_env(),
            instructions: Some(
                "Airline customer service tools. Resolve the user with get_user_info, \
                 search with fetch_flight_info, choose with pick_flight, then book_flight. \
                 Use file_ticket for anything these tools cannot handle."
                    .to_string(),
            ),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".to_string().into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(tracing_subscriber::fmt::time::ChronoUtc::rfc_3339())
                .with_writer(std::io::stderr),
        )
        .init();

    let args = Args::parse();
    tracing::debug!("Parsed args: {:?}", args);

    let seed = SeedData::load(args.seed.as_deref()).context("Failed to load seed data")?;
    let desk = Arc::new(AirlineDesk::new(seed).context("Failed to create airline desk")?);

    match args.command {
        Command::Stdio => {
            eprintln!("Starting MCP server over stdio...");
            let server = AirlineAgentServer::new(desk);
            let (stdin, stdout) = rmcp::transport::io::stdio();
            let running = serve_server(Arc::new(server), (stdin, stdout))
                .await
                .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;
            let quit_reason = running
                .waiting()
                .await
                .context("MCP server task failed")?;
            tracing::debug!("Server stopped: {:?}", quit_reason);
        }
        Command::Http { host, port } => {
            let addr: SocketAddr = format!("{}:{}", host, port)
                .parse()
                .context("Invalid host:port")?;
            tracing::info!("Starting MCP server over HTTP on {}", addr);
            let server = AirlineAgentServer::new(desk);
            let session_manager = Arc::new(LocalSessionManager::default());
            let config = StreamableHttpServerConfig {
                stateful_mode: true,
                ..Default::default()
            };
            let service =
                StreamableHttpService::new(move || Ok(server.clone()), session_manager, config);
            let app = axum::Router::new().nest_service("/mcp", service);
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .context("Failed to bind to address")?;

            let shutdown = CancellationToken::new();
            let on_signal = shutdown.clone();
            tokio::spawn(async move {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        tracing::info!("Ctrl-C received, shutting down");
                        on_signal.cancel();
                    }
                    Err(e) => tracing::warn!("Cannot listen for Ctrl-C: {}", e),
                }
            });

            tracing::debug!("Listening on {}", addr);
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { shutdown.cancelled().await })
                .await
                .context("HTTP server error")?;
        }
    }

    Ok(())
}
