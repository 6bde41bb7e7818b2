//! Loading property files and directories into a naming tree.

use std::path::Path;

use tracing::{debug, trace};

use crate::bind::{subcontext, Binder, Delimiter, ObjectSlot, Placement};
use crate::config::{ConfigError, FileSource, LoaderConfig, PropertySource};
use crate::convert::{ConverterRegistry, TYPE_ATTRIBUTE};
use crate::{Context, Error, PropertyBag};

/// Directory names never mirrored into the tree.
const SKIPPED_DIRECTORIES: [&str; 2] = [".svn", "CVS"];

/// Loads property bags, files and directory trees into a [`Context`].
///
/// ## Example
///
/// ```
/// use naming_loader::{Context, ConverterRegistry, Loader, LoaderConfig, PropertyBag, Value};
///
/// let registry = ConverterRegistry::with_defaults();
/// let loader = Loader::new(LoaderConfig::new().with_delimiter("."), &registry)?;
///
/// let mut bag = PropertyBag::new();
/// bag.insert("pool.size.type".into(), "Integer".into());
/// bag.insert("pool.size".into(), "8".into());
/// bag.insert("pool.name".into(), "main".into());
///
/// let mut root = Context::new();
/// loader.load_properties(bag, &mut root)?;
/// assert_eq!(root.value_at(&["pool", "size"]), Some(&Value::Integer(8)));
/// assert_eq!(root.value_at(&["pool", "name"]), Some(&Value::from("main")));
/// # Ok::<(), naming_loader::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Loader<'r> {
    config: LoaderConfig,
    binder: Binder<'r>,
}

impl<'r> Loader<'r> {
    /// Creates a loader. Fails if the config has no delimiter or the
    /// delimiter is not a valid pattern.
    pub fn new(config: LoaderConfig, registry: &'r ConverterRegistry) -> Result<Self, Error> {
        let delimiter = config.delimiter().ok_or(ConfigError::MissingDelimiter)?;
        let delimiter = Delimiter::new(delimiter)?;
        Ok(Self {
            config,
            binder: Binder::new(delimiter, registry),
        })
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Binds one bag directly into `ctx`.
    ///
    /// A bag with a bare `type` key has no name to be bound under here and
    /// fails with [`Error::UnsupportedOperation`].
    pub fn load_properties(&self, bag: PropertyBag, ctx: &mut Context) -> Result<(), Error> {
        self.binder.bind(bag, ctx, &Placement::default())
    }

    /// Reads `source` once and binds its bag into `ctx`.
    pub fn load_source(&self, source: &dyn PropertySource, ctx: &mut Context) -> Result<(), Error> {
        let bag = source.properties()?;
        self.load_properties(bag, ctx)
    }

    /// Loads a single property file, or every property file below a directory.
    ///
    /// Subdirectories become branches. Within a branch, `default.*` files
    /// bind into the branch itself, a file with a bare `type` key becomes one
    /// object named after the file, and any other file gets its own branch
    /// named after the file.
    pub fn load_path(&self, path: impl AsRef<Path>, ctx: &mut Context) -> Result<(), Error> {
        let path = path.as_ref();
        if path.is_dir() {
            self.load_directory(path, ctx, &[])
        } else if path.is_file() {
            self.load_file(path, ctx, &[])
        } else {
            Err(ConfigError::FileNotFound(path.to_path_buf()).into())
        }
    }

    /// Parses one property file with this loader's delimiter.
    pub fn to_properties(&self, path: &Path) -> Result<PropertyBag, Error> {
        let mut source = FileSource::new(path, true);
        if let Some(separator) = self.binder.delimiter().literal() {
            source = source.with_separator(separator);
        }
        Ok(source.properties()?)
    }

    fn load_directory(&self, dir: &Path, root: &mut Context, branch: &[String]) -> Result<(), Error> {
        debug!(path = %dir.display(), "loading directory");
        let read_error = |source| ConfigError::ReadError {
            path: dir.to_path_buf(),
            source,
        };

        let mut entries = std::fs::read_dir(dir)
            .map_err(read_error)?
            .map(|entry| entry.map(|entry| entry.path()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_error)?;
        entries.sort();

        for entry in entries {
            let Some(file_name) = entry.file_name().and_then(|name| name.to_str()) else {
                trace!(path = %entry.display(), "skipping non UTF-8 name");
                continue;
            };

            if entry.is_dir() {
                if SKIPPED_DIRECTORIES.contains(&file_name) {
                    debug!(path = %entry.display(), "skipping version control directory");
                    continue;
                }
                let mut child = branch.to_vec();
                child.push(self.config.apply_colon_replace(file_name));
                subcontext::resolve(&child, root)?;
                self.load_directory(&entry, root, &child)?;
            } else if FileSource::is_supported(&entry) {
                self.load_file(&entry, root, branch)?;
            } else {
                debug!(path = %entry.display(), "skipping unsupported file");
            }
        }
        Ok(())
    }

    fn load_file(&self, file: &Path, root: &mut Context, branch: &[String]) -> Result<(), Error> {
        let Some(stem) = file.file_stem().and_then(|stem| stem.to_str()) else {
            trace!(path = %file.display(), "skipping non UTF-8 name");
            return Ok(());
        };
        let name = self.config.apply_colon_replace(stem);
        let bag = self.to_properties(file)?;
        debug!(path = %file.display(), keys = bag.len(), "loading property file");

        let placement = if bag.contains_key(TYPE_ATTRIBUTE) {
            // The file describes one object bound under the file's name.
            Placement::at(branch.to_vec()).with_object(ObjectSlot::new(branch.to_vec(), name))
        } else if stem != "default" {
            let mut target = branch.to_vec();
            target.push(name.clone());
            Placement::at(target).with_object(ObjectSlot::new(branch.to_vec(), name))
        } else {
            Placement::at(branch.to_vec())
        };

        self.binder.bind(bag, root, &placement)
    }
}
