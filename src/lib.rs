//! Keyrot - rotate RSA credential pairs stored as GitHub Actions secrets.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── rotate        # Resolve config, run a batch, report
//! │   ├── actions       # Workflow outputs and annotations
//! │   ├── output        # Terminal output helpers
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── pair          # Credential pairs, slot names, input parsing
//!     ├── keygen        # RSA key-pair generation
//!     ├── sink/         # Secret store backends
//!     │   ├── mod       # SecretSink trait, set_secret
//!     │   └── github    # GitHub Actions secrets
//!     ├── rotation      # Single-credential rotation
//!     ├── batch         # Batch rotation and failure policy
//!     ├── config        # Flags, env and TOML config resolution
//!     └── audit         # Value previews and fingerprints
//! ```
//!
//! # Rotation
//!
//! For a credential named `SVC` with current values `(public, private)`:
//!
//! - `public` is archived to `SVC_PUBLIC_KEY_PREV`
//! - `private` is archived to `SVC_PRIVATE_KEY_PREV`
//! - a fresh 4096-bit RSA pair is published to `SVC_PUBLIC_KEY` and
//!   `SVC_PRIVATE_KEY`

pub mod cli;
pub mod core;
pub mod error;
