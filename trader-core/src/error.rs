use thiserror::Error;

pub type Result<T> = std::result::Result<T, TraderError>;

/// Every way a dashboard action can be declined.
///
/// None of these are fatal: the dashboard leaves its prior state intact and
/// surfaces the error as a notice.
#[derive(Error, Debug)]
pub enum TraderError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Please enter a valid base58 secret key")]
    InvalidSecret,

    #[error("Please enter a valid Solana token mint address")]
    InvalidMint,

    #[error("Already connected to the RPC endpoint")]
    AlreadyConnected,

    #[error("Funding wallet is already loaded")]
    AlreadyLoaded,

    #[error("Please enter a number between 1 and {max} (got {count})")]
    InvalidWalletCount { count: usize, max: usize },

    #[error("Create wallets first before exporting")]
    NoWallets,

    #[error("Invalid JSON format. Please check your data.")]
    InvalidWalletFormat,

    #[error("Budget must be at least €1.00")]
    InvalidBudget,

    #[error("Minimum budget required: €{minimum:.2}")]
    InsufficientBudget { minimum: f64 },

    #[error("{0}")]
    PrerequisitesNotMet(&'static str),

    #[error("Auto-funding is already running")]
    FundingInProgress,

    #[error("Please validate the token mint address first")]
    MintNotValidated,

    #[error("Min trade must be less than max trade")]
    InvalidTradeRange,

    #[error("{field} is out of range")]
    OutOfRange { field: &'static str },

    #[error("{field} must be a number (got {input:?})")]
    InvalidNumber { field: &'static str, input: String },

    #[error("Connect RPC, load funding, add wallets and save settings first")]
    SetupIncomplete,

    #[error("Trading session is already running")]
    SessionAlreadyRunning,

    #[error("{0} is already in progress")]
    OperationInProgress(&'static str),

    #[error("Check balances first or ensure wallets have tokens")]
    NoBalances,

    #[error("Check balances first or ensure wallets have SOL")]
    NoFunds,

    #[error("Could not read {path}: {source}")]
    ImportRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TraderError {
    /// Short headline shown above the error message in a notice.
    pub fn title(&self) -> &'static str {
        match self {
            TraderError::MissingField("RPC URL") => "Invalid RPC URL",
            TraderError::MissingField("funding secret") => "Missing Funding Secret",
            TraderError::MissingField("token mint") => "Token Mint Required",
            TraderError::MissingField(_) => "Missing Input",
            TraderError::InvalidSecret => "Invalid Secret Key",
            TraderError::InvalidMint => "Invalid Mint Address",
            TraderError::AlreadyConnected => "RPC Connected",
            TraderError::AlreadyLoaded => "Funding Loaded",
            TraderError::InvalidWalletCount { .. } => "Invalid Wallet Count",
            TraderError::NoWallets => "No Wallets to Export",
            TraderError::InvalidWalletFormat | TraderError::ImportRead { .. } => "Import Failed",
            TraderError::InvalidBudget | TraderError::InsufficientBudget { .. } => {
                "Insufficient Budget"
            }
            TraderError::PrerequisitesNotMet(_) | TraderError::SetupIncomplete => {
                "Prerequisites Not Met"
            }
            TraderError::FundingInProgress | TraderError::OperationInProgress(_) => "Busy",
            TraderError::MintNotValidated => "Validate Mint First",
            TraderError::InvalidTradeRange => "Invalid Trade Range",
            TraderError::OutOfRange { .. } | TraderError::InvalidNumber { .. } => "Invalid Setting",
            TraderError::SessionAlreadyRunning => "Trading Active",
            TraderError::NoBalances => "No Tokens to Sell",
            TraderError::NoFunds => "No Funds to Sweep",
            TraderError::Io(_) | TraderError::Json(_) => "Export Failed",
        }
    }
}
