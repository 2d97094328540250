use log::info;
use rmcp::handler::server::ServerHandler;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo};
use rmcp::{ErrorData as McpError, ServiceExt, tool, tool_handler, tool_router};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use mdtoc::{Toc, TocConfig, extract, fetch};

#[derive(Clone)]
pub struct OutlineServer {
    default_config: TocConfig,
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
struct OutlineInput {
    /// Raw Markdown text.
    markdown: String,
    /// Heading levels forming the top of the outline; the smallest one wins.
    top_levels: Option<Vec<u8>>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
struct OutlineUrlInput {
    url: String,
    top_levels: Option<Vec<u8>>,
}

#[derive(Debug, Serialize, JsonSchema)]
struct OutlineUrlOutput {
    source_url: String,
    converted_from_html: bool,
    toc: Toc,
}

impl OutlineServer {
    fn config(&self, top_levels: Option<Vec<u8>>) -> Result<TocConfig, McpError> {
        match top_levels {
            Some(levels) => TocConfig::new(levels)
                .map_err(|e| McpError::invalid_params(e.to_string(), None)),
            None => Ok(self.default_config.clone()),
        }
    }
}

#[tool_router]
impl OutlineServer {
    pub fn new(default_config: TocConfig) -> Self {
        Self {
            default_config,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Extract headings from Markdown and build a table of contents. Recognizes ATX (#), Setext (underlined) and single-line <hN> headings, ignores fenced code, and returns GitHub-style anchor slugs, a two-level outline and per-level heading counts.")]
    async fn outline(&self, params: Parameters<OutlineInput>) -> Result<rmcp::Json<Toc>, McpError> {
        let config = self.config(params.0.top_levels)?;
        Ok(rmcp::Json(extract(&params.0.markdown, &config)))
    }

    #[tool(description = "Fetch a post by URL and build its table of contents. Markdown sources (.md, /index.md) are tried concurrently and preferred; HTML pages are converted to Markdown first.")]
    async fn outline_url(
        &self,
        params: Parameters<OutlineUrlInput>,
    ) -> Result<rmcp::Json<OutlineUrlOutput>, McpError> {
        let config = self.config(params.0.top_levels)?;

        let client = fetch::client()
            .map_err(|e| McpError::internal_error(format!("Failed to create HTTP client: {e}"), None))?;
        let document = fetch::fetch_markdown(&client, &params.0.url)
            .await
            .map_err(|e| McpError::invalid_request(e.to_string(), None))?;

        let toc = extract(&document.markdown, &config);
        Ok(rmcp::Json(OutlineUrlOutput {
            source_url: document.url,
            converted_from_html: document.converted_from_html,
            toc,
        }))
    }
}

#[tool_handler]
impl ServerHandler for OutlineServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Markdown table-of-contents builder. Headings get GitHub-style anchor slugs that match rendered heading ids; duplicates are suffixed -1, -2, ..."
                    .to_string(),
            ),
        }
    }
}

pub async fn serve(default_config: TocConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!("serving MCP over stdio");
    let server = OutlineServer::new(default_config);

    let running = server
        .serve((tokio::io::stdin(), tokio::io::stdout()))
        .await?;

    running.waiting().await?;

    Ok(())
}
