use anyhow::Result;
use colored::*;
use meshroom::IceServerConfig;
use meshroom::server::{ServerConfig, serve};

#[derive(clap::Args)]
pub struct ServeArgs {
    #[arg(long, env = "MESHROOM_HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Allowed browser origin, `*` for any
    #[arg(long, env = "MESHROOM_CORS_ORIGIN", default_value = "http://localhost:5173")]
    cors_origin: String,

    /// STUN server handed to clients; repeatable. Defaults to Google's.
    #[arg(long = "stun-url")]
    stun_urls: Vec<String>,

    #[arg(long, env = "TURN_URL")]
    turn_url: Option<String>,

    #[arg(long, env = "TURN_USERNAME", requires = "turn_url")]
    turn_username: Option<String>,

    #[arg(long, env = "TURN_CREDENTIAL", requires = "turn_url")]
    turn_credential: Option<String>,

    /// Only relay signals between members of a common room
    #[arg(long, env = "MESHROOM_REQUIRE_SHARED_ROOM")]
    require_shared_room: bool,
}

impl ServeArgs {
    fn into_config(self) -> ServerConfig {
        let mut ice_servers = if self.stun_urls.is_empty() {
            ServerConfig::default().ice_servers
        } else {
            vec![IceServerConfig {
                urls: self.stun_urls,
                username: None,
                credential: None,
            }]
        };

        if let Some(turn_url) = self.turn_url {
            ice_servers.push(IceServerConfig {
                urls: vec![turn_url],
                username: self.turn_username,
                credential: self.turn_credential,
            });
        }

        ServerConfig {
            host: self.host,
            port: self.port,
            cors_origin: self.cors_origin,
            ice_servers,
            require_shared_room: self.require_shared_room,
        }
    }
}

pub async fn run(args: ServeArgs) -> Result<()> {
    let config = args.into_config();

    println!(
        "{} {}",
        "📡 Meshroom relay on".green().bold(),
        format!("ws://{}:{}/ws", config.host, config.port).cyan()
    );
    for server in &config.ice_servers {
        println!("   🧊 {}", server.urls.join(", "));
    }

    serve(config).await
}
