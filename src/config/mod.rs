pub mod settings;

pub use settings::{Defaults, EnvSnapshot, Flags, Settings};

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "sched-talks")]
#[command(about = "Export the Sched schedule and talk attachments as a README")]
pub struct CliConfig {
    #[arg(short, long, value_name = "DIR", help = "Attachments output directory [default: files]")]
    pub output_dir: Option<String>,

    #[arg(short = 't', long = "token", value_name = "TOKEN", help = "sched.com API key/token")]
    pub api_key: Option<String>,

    #[arg(
        short = 'j',
        long,
        value_name = "N",
        help = "Attachments downloaded at the same time [default: 1]"
    )]
    pub concurrent_downloads: Option<usize>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn flags(&self) -> Flags {
        Flags {
            output_dir: self.output_dir.clone(),
            api_key: self.api_key.clone(),
            concurrent_downloads: self.concurrent_downloads,
        }
    }
}
