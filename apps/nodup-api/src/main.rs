use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = nodup_api::Args::parse();

	nodup_api::run(args).await
}
