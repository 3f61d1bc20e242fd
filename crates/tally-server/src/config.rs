use clap::Parser;

/// Server configuration parsed from command line arguments and environment variables
#[derive(Parser, Debug, Clone)]
#[command(name = "tally-server")]
#[command(author, version, about = "REST API server for the Tally sales reports")]
pub struct ServerConfig {
    /// MongoDB connection URL
    #[arg(long, env = "MONGO_URL")]
    pub mongo_url: String,

    /// Database holding the sales, customers and products collections
    #[arg(long, env = "MONGO_DB", default_value = "sales")]
    pub database: String,

    /// Server port to listen on
    #[arg(short, long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Server host to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Comma-separated allowed CORS origins, or "*" for any
    #[arg(long, env = "CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,
}
