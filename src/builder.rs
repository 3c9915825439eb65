use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ImportConfig;
use crate::ingredients::parse_line;
use crate::model::{Ingredient, RecipeExtractionResult};
use crate::pipelines;
use crate::rules::RuleTableProvider;
use crate::url_to_text::fetchers::{HtmlFetcher, RequestFetcher};
use crate::ImportError;

/// Builder for configuring a [`RecipeImporter`]
///
/// Every setting is optional. Unset values come from
/// [`ImportConfig::default`] or from the config passed to
/// [`RecipeImporterBuilder::config`].
#[derive(Default)]
pub struct RecipeImporterBuilder {
    config: Option<ImportConfig>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    rules_dir: Option<PathBuf>,
    rules: Option<Arc<RuleTableProvider>>,
    fetcher: Option<Box<dyn HtmlFetcher>>,
}

impl RecipeImporterBuilder {
    /// Start from a loaded configuration
    ///
    /// # Example
    /// ```
    /// use recipeer_import::{ImportConfig, RecipeImporter};
    ///
    /// let builder = RecipeImporter::builder()
    ///     .config(ImportConfig::default());
    /// ```
    pub fn config(mut self, config: ImportConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a timeout for HTTP requests
    ///
    /// The timeout is kept in whole seconds, rounded up, so 1500 ms becomes
    /// 2 s and 900 ms becomes 1 s. A zero duration is rejected by `build()`.
    ///
    /// # Example
    /// ```
    /// use recipeer_import::RecipeImporter;
    /// use std::time::Duration;
    ///
    /// let builder = RecipeImporter::builder()
    ///     .timeout(Duration::from_secs(30));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Set the User-Agent header sent with every fetch
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Load rule tables from a directory instead of the embedded ones
    ///
    /// The directory holds `units.<lang>.json` and `notes_rules.<lang>.json`.
    pub fn rules_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.rules_dir = Some(dir.into());
        self
    }

    /// Share an existing rule table provider and its cache
    ///
    /// Takes precedence over [`RecipeImporterBuilder::rules_dir`].
    ///
    /// # Example
    /// ```
    /// use recipeer_import::{RecipeImporter, RuleTableProvider};
    /// use std::sync::Arc;
    ///
    /// let rules = Arc::new(RuleTableProvider::builtin());
    /// let first = RecipeImporter::builder().rules(Arc::clone(&rules));
    /// let second = RecipeImporter::builder().rules(rules);
    /// ```
    pub fn rules(mut self, rules: Arc<RuleTableProvider>) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Replace the network fetcher
    ///
    /// Timeout and User-Agent settings only apply to the default
    /// [`RequestFetcher`].
    pub fn fetcher(mut self, fetcher: impl HtmlFetcher + 'static) -> Self {
        self.fetcher = Some(Box::new(fetcher));
        self
    }

    /// Build the importer
    ///
    /// # Errors
    /// Returns `ImportError` if:
    /// - The timeout is zero
    /// - The User-Agent is not a valid header value
    /// - The HTTP client cannot be created
    ///
    /// # Example
    /// ```no_run
    /// # use recipeer_import::RecipeImporter;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let importer = RecipeImporter::builder().build()?;
    /// let recipe = importer.extract_recipe("https://example.com/recipe")?;
    /// println!("{}", recipe.title);
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<RecipeImporter, ImportError> {
        let mut config = self.config.unwrap_or_default();
        if let Some(timeout) = self.timeout {
            config.timeout = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
        }
        if let Some(user_agent) = self.user_agent {
            config.user_agent = user_agent;
        }
        if let Some(dir) = self.rules_dir {
            config.rules_dir = Some(dir.to_string_lossy().into_owned());
        }

        if config.timeout == 0 {
            return Err(ImportError::BuilderError(
                "Timeout must be at least one second".to_string(),
            ));
        }

        let rules = self.rules.unwrap_or_else(|| {
            Arc::new(match config.rules_path() {
                Some(dir) => RuleTableProvider::from_dir(dir),
                None => RuleTableProvider::builtin(),
            })
        });

        let fetcher = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Box::new(RequestFetcher::from_config(&config)?),
        };

        Ok(RecipeImporter {
            config,
            rules,
            fetcher,
        })
    }
}

/// Extracts recipes from web pages
///
/// Holds the fetcher and the per-language rule cache, so one importer
/// should be reused across many URLs.
pub struct RecipeImporter {
    config: ImportConfig,
    rules: Arc<RuleTableProvider>,
    fetcher: Box<dyn HtmlFetcher>,
}

impl RecipeImporter {
    /// Creates a new builder for importing recipes
    ///
    /// # Example
    /// ```
    /// use recipeer_import::RecipeImporter;
    ///
    /// let builder = RecipeImporter::builder();
    /// ```
    pub fn builder() -> RecipeImporterBuilder {
        RecipeImporterBuilder::default()
    }

    /// Fetch a page and return its recipe, or a title-only placeholder
    /// when the page carries no JSON-LD Recipe.
    ///
    /// # Errors
    /// `InvalidUrl` for non-http(s) input, `UpstreamStatus` or `Transport`
    /// when the fetch fails.
    pub fn extract_recipe(&self, url: &str) -> Result<RecipeExtractionResult, ImportError> {
        pipelines::url::process(self.fetcher.as_ref(), &self.rules, url)
    }

    /// Fetch a page and map its JSON-LD Recipe node, if any.
    pub fn extract_from_jsonld(
        &self,
        url: &str,
    ) -> Result<Option<RecipeExtractionResult>, ImportError> {
        pipelines::url::process_jsonld(self.fetcher.as_ref(), &self.rules, url)
    }

    /// Same as [`RecipeImporter::extract_recipe`] for markup fetched elsewhere.
    ///
    /// # Example
    /// ```
    /// use recipeer_import::RecipeImporter;
    ///
    /// let importer = RecipeImporter::builder().build().unwrap();
    /// let recipe = importer.extract_from_markup(
    ///     "https://example.com/cake",
    ///     "<html><head><title>Cake</title></head></html>",
    /// );
    /// assert_eq!(recipe.title, "Cake");
    /// assert!(recipe.needs_manual_entry());
    /// ```
    pub fn extract_from_markup(&self, url: &str, markup: &str) -> RecipeExtractionResult {
        pipelines::url::process_markup(&self.rules, url, markup)
    }

    /// Parse one ingredient line with the rules for `lang`.
    ///
    /// # Example
    /// ```
    /// use recipeer_import::RecipeImporter;
    ///
    /// let importer = RecipeImporter::builder().build().unwrap();
    /// let ingredient = importer.parse_ingredient("2 dl mjölk", "sv");
    /// assert_eq!(ingredient.quantity.as_deref(), Some("2"));
    /// assert_eq!(ingredient.unit.as_deref(), Some("dl"));
    /// assert_eq!(ingredient.name, "mjölk");
    /// ```
    pub fn parse_ingredient(&self, line: &str, lang: &str) -> Ingredient {
        parse_line(line, &self.rules.get_rules(lang))
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    pub fn rules(&self) -> &Arc<RuleTableProvider> {
        &self.rules
    }
}
