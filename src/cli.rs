use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "multicloud",
    version,
    about = "Create or delete a storage bucket on AWS and GCP"
)]
#[allow(clippy::struct_excessive_bools)]
pub struct Args {
    /// Operate on an S3 bucket in AWS
    #[arg(long)]
    pub aws: bool,

    /// Operate on a Cloud Storage bucket in GCP
    #[arg(long)]
    pub gcp: bool,

    /// Create the bucket
    #[arg(long)]
    pub create: bool,

    /// Delete the bucket
    #[arg(long)]
    pub delete: bool,

    /// Name of the bucket
    #[arg(long = "bucketname", value_name = "NAME", default_value = "")]
    pub bucket_name: String,

    /// Exit with status 2 when any provider operation fails
    #[arg(long)]
    pub fail_on_error: bool,
}
