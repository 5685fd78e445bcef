use crate::config::Config;
use crate::data::Dataset;
use crate::export::{write_csv, write_json, write_rendered};
use crate::render::{HtmlRenderer, Palette, Renderer, TextRenderer};
use crate::series::AnalysisMode;
use anyhow::{Context, Result};
use glob::glob;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Runs the variability workflow on a data directory holding
/// `config.toml` and `companies.toml`.
pub struct Manager {
    data_dir: PathBuf,
    cfg: Config,
}

impl Manager {
    pub fn new<P: AsRef<Path>>(data_dir: P, mode: Option<AnalysisMode>) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();

        let mut cfg =
            Config::from_file(data_dir.join("config.toml")).context("failed to construct cfg")?;
        if let Some(mode) = mode {
            cfg.mode = mode;
        }
        log::info!("{cfg:#?}");

        Ok(Self { data_dir, cfg })
    }

    /// Print the text table of every company, or of a single one.
    pub fn show_table(&self, company_id: Option<u64>) -> Result<()> {
        let dataset = self.load_dataset()?;
        let (_, annotated) = dataset
            .build_tables(self.cfg.mode, company_id)
            .context("failed to build tables")?;

        print!("{}", TextRenderer.render(&annotated));

        Ok(())
    }

    pub fn export_tables(&self) -> Result<()> {
        let dataset = self.load_dataset()?;
        let (plain, annotated) = dataset
            .build_tables(self.cfg.mode, None)
            .context("failed to build tables")?;

        let output = &self.cfg.output;
        if output.csv {
            let file = self.export_file("csv");
            write_csv(&plain, &file).context("failed to export csv")?;
            log::info!("wrote {file:?}");
        }
        if output.json {
            let file = self.export_file("json");
            write_json(&annotated, &file).context("failed to export json")?;
            log::info!("wrote {file:?}");
        }
        if output.html {
            let file = self.export_file("html");
            write_rendered(&HtmlRenderer::new(Palette), &annotated, &file)
                .context("failed to export html")?;
            log::info!("wrote {file:?}");
        }

        Ok(())
    }

    /// Remove every file previously written by [`Manager::export_tables`].
    pub fn clean_exports(&self) -> Result<()> {
        let pattern = self
            .data_dir
            .join(format!("{}_*", self.cfg.output.file_stem));
        let pattern = pattern.to_str().context("pattern is not valid UTF-8")?;
        let files: Vec<_> = glob(pattern)
            .context("failed to glob exported files")?
            .filter_map(Result::ok)
            .filter(|p| {
                p.is_file()
                    && p.extension()
                        .is_some_and(|ext| ext == "csv" || ext == "json" || ext == "html")
            })
            .collect();

        for file in files {
            fs::remove_file(&file).with_context(|| format!("failed to remove {file:?}"))?;
            log::info!("removed {file:?}");
        }

        Ok(())
    }

    fn load_dataset(&self) -> Result<Dataset> {
        let file = self.data_dir.join("companies.toml");
        let dataset = Dataset::from_file(&file).context("failed to load dataset")?;
        log::info!("loaded {} companies from {file:?}", dataset.companies.len());
        Ok(dataset)
    }

    fn export_file(&self, ext: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}_{}.{ext}", self.cfg.output.file_stem, self.cfg.mode))
    }
}
