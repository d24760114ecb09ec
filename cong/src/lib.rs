//! Typed configuration loading from layered documents and environment
//! variables.
//!
//! A target type describes its fields through [`Schema`], normally derived
//! with `#[derive(Schema)]`. Loading binds every leaf field to an environment
//! variable named `<PREFIX>_<SNAKE_CASE_PATH>`, merges the discovered
//! documents (later documents win, mappings are merged recursively and
//! sequences are replaced) and finally materializes a fresh value. For each
//! leaf a non-empty environment variable wins over the documents, which win
//! over [`Default`].
//!
//! ```no_run
//! use cong::{Format, Schema};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Deserialize, Serialize, Schema)]
//! struct Settings {
//!     app: App,
//!     server: Server,
//! }
//!
//! #[derive(Debug, Default, Deserialize, Serialize, Schema)]
//! struct App {
//!     name: String,
//! }
//!
//! #[derive(Debug, Default, Deserialize, Serialize, Schema)]
//! struct Server {
//!     #[cong(map_name = "serverName")]
//!     name: String,
//!     port: u16,
//! }
//!
//! // Reads ./cfg/**/*.yaml; HELLO_SERVER_PORT=8080 overrides server.port.
//! let settings: Settings = cong::load_from_dir("hello", "./cfg", Format::Yaml)?;
//! # Ok::<(), cong::CongError>(())
//! ```

extern crate self as cong;

mod coerce;
mod error;
mod format;
mod introspect;
mod loader;
mod naming;
mod parser;
mod schema;
mod source;
mod store;
mod value;

pub use cong_macros::Schema;

pub use coerce::{Origin, Resolved};
pub use error::{BoxError, CongError, CongResult};
pub use format::{Format, UnknownFormat};
pub use introspect::{LeafBinding, LeafShape, bind, leaves};
pub use loader::{
    DEFAULT_SEARCH_PATHS, Loader, Target, load, load_from_dir, load_from_embedded,
    load_from_embedded_by_path, load_from_env,
};
pub use naming::{canonical_key, env_var_name, normalize_prefix, to_snake};
pub use parser::{
    DotenvParser, HclParser, IniParser, JsonParser, Parser, ParserRegistry, PropertiesParser,
    TomlParser, YamlParser,
};
pub use schema::{FieldKind, FieldSchema, LeafKind, LeafType, NestedSchema, Schema};
pub use source::{ByteReader, DirWalker, EmbeddedDir, EmbeddedFile, FsSource, WalkEntry};
pub use store::{EnvKeyReplacer, Store, StoreState};
pub use value::{Mapping, Scalar, Value};
