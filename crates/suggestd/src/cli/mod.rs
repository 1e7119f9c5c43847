//! Client-side commands that talk to a running daemon.

use astp_protocol::{CreateForm, ImageAttachment};
use clap::Args;
use std::path::PathBuf;
use suggest_config_and_utils::Paths;
use suggest_ipc::{IpcClient, Method};
use tracing::debug;

/// Arguments of `suggestd create`.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// The suggestion text
    #[arg(long)]
    pub term: Option<String>,

    /// Rank weight; sent as text and parsed by the daemon
    #[arg(long)]
    pub weight: Option<String>,

    /// Key of the entity the suggestion belongs to
    #[arg(long)]
    pub key: Option<String>,

    /// Target index; the daemon's default index if omitted
    #[arg(long = "index")]
    pub index_name: Option<String>,

    /// Image file to attach
    #[arg(long, requires_all = ["image_width", "image_height"])]
    pub image: Option<PathBuf>,

    /// Declared image width in pixels
    #[arg(long)]
    pub image_width: Option<u32>,

    /// Declared image height in pixels
    #[arg(long)]
    pub image_height: Option<u32>,

    /// Media type of the image
    #[arg(long, default_value = "image/jpeg")]
    pub image_type: String,
}

impl CreateArgs {
    /// Build the multipart form to send.
    pub async fn into_form(self) -> std::io::Result<CreateForm> {
        let mut form = CreateForm::multipart();
        form.term = self.term;
        form.weight = self.weight;
        form.key = self.key;
        form.index_name = self.index_name;

        if let Some(path) = self.image {
            let data = tokio::fs::read(&path).await?;
            debug!(path = %path.display(), bytes = data.len(), "Attaching image");
            form.image = Some(ImageAttachment::new(
                self.image_type,
                self.image_width.unwrap_or_default(),
                self.image_height.unwrap_or_default(),
                data,
            ));
        }
        Ok(form)
    }
}

/// Submit one suggestion and print the daemon's response.
pub async fn create(paths: &Paths, args: CreateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let form = args.into_form().await?;
    let client = IpcClient::new(paths.socket_file());

    let result = client
        .call_method_with_params(Method::SuggestionCreate, form.to_params())
        .await?
        .into_result()?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
