//! `hrsd attach` and `hrsd fetch` commands - Attachment handling
//!
//! Attach screens the file extension, stores the bytes in the portal's
//! blob store, and records the reference on the request. Fetch writes
//! the stored bytes back to disk.

use std::path::PathBuf;

use console::style;
use miette::Result;

use crate::cli::helpers::{open_desk, resolve_request, write_output};
use crate::core::blob::{BlobStore, FsBlobStore};

#[derive(clap::Args, Debug)]
pub struct AttachArgs {
    /// Request id or unique prefix
    pub reference: String,

    /// File to attach
    pub file: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct FetchArgs {
    /// Request id or unique prefix
    pub reference: String,

    /// Attachment index as shown by `hrsd show`
    #[arg(default_value = "0")]
    pub index: usize,

    /// Output path (defaults to the original filename)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Run the attach command
pub fn run_attach(args: AttachArgs) -> Result<()> {
    let desk = open_desk()?;
    let id = resolve_request(&desk, &args.reference)?;

    let blobs = FsBlobStore::new(desk.portal.uploads_dir());
    let blob_ref = blobs
        .put_file(&args.file)
        .map_err(|e| miette::miette!("{}", e))?;
    let filename = args
        .file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    let request = desk
        .store
        .add_attachment(&id, &blob_ref, &filename)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Attached {} to {} ({} attachment(s))",
        style("✓").green().bold(),
        filename,
        style(&request.id).bold(),
        request.attachments.len()
    );

    Ok(())
}

/// Run the fetch command
pub fn run_fetch(args: FetchArgs) -> Result<()> {
    let desk = open_desk()?;
    let id = resolve_request(&desk, &args.reference)?;
    let request = desk.store.get(&id).map_err(|e| miette::miette!("{}", e))?;

    let attachment = request.attachments.get(args.index).ok_or_else(|| {
        miette::miette!(
            "{} has {} attachment(s); index {} is out of range",
            request.id,
            request.attachments.len(),
            args.index
        )
    })?;

    let blobs = FsBlobStore::new(desk.portal.uploads_dir());
    let bytes = blobs
        .get(&attachment.blob_ref)
        .map_err(|e| miette::miette!("{}", e))?;

    let dest = args
        .output
        .unwrap_or_else(|| PathBuf::from(&attachment.filename));
    write_output(&dest, &bytes)?;

    println!(
        "{} Wrote {} ({} bytes) to {}",
        style("✓").green().bold(),
        attachment.filename,
        bytes.len(),
        dest.display()
    );

    Ok(())
}
