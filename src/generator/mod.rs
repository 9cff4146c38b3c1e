//! Build pipeline - loads documents, renders them, writes the output tree

mod feed;

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::loader::ContentLoader;
use crate::content::RenderedPage;
use crate::error::BuildError;
use crate::render::Renderer;
use crate::templates::TemplateRegistry;
use crate::writer::{check_collisions, Writer};
use crate::Site;

/// Pipeline stages. A build moves strictly forward, or to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    Idle,
    Loading,
    Rendering,
    Writing,
    Done,
    Failed,
}

/// Outcome of a build
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Pages written, the front page and feed included
    pub written: usize,
    /// Documents skipped in best-effort mode, with the reason
    pub skipped: Vec<BuildError>,
}

/// Static site generator: one instance per build invocation
pub struct Generator {
    site: Site,
    renderer: Renderer,
    writer: Writer,
}

impl Generator {
    pub fn new(site: &Site) -> Result<Self> {
        let registry = TemplateRegistry::load(&site.layouts_dir)?;
        let renderer = Renderer::new(&site.config, registry);
        let writer = Writer::new(&site.output_dir);

        Ok(Self {
            site: site.clone(),
            renderer,
            writer,
        })
    }

    /// Run the full pipeline.
    ///
    /// Document errors abort the build in strict mode and are collected
    /// into the report otherwise. Write failures abort regardless: output
    /// is either fully built or not built.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let mut stage = BuildStage::Idle;
        match self.run(&mut stage) {
            Ok(report) => {
                advance(&mut stage, BuildStage::Done);
                Ok(report)
            }
            Err(e) => {
                advance(&mut stage, BuildStage::Failed);
                Err(e)
            }
        }
    }

    fn run(&self, stage: &mut BuildStage) -> Result<BuildReport, BuildError> {
        let mut report = BuildReport::default();

        advance(stage, BuildStage::Loading);
        let loader = ContentLoader::new(&self.site);
        let mut posts = Vec::new();
        for item in loader.posts() {
            match item {
                Ok(doc) => posts.push(doc),
                Err(e) => self.document_error(e, &mut report)?,
            }
        }
        let mut pages = Vec::new();
        for item in loader.pages() {
            match item {
                Ok(doc) => pages.push(doc),
                Err(e) => self.document_error(e, &mut report)?,
            }
        }

        // Site order: newest first, slug breaks date ties
        posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));

        tracing::info!("Loaded {} posts and {} pages", posts.len(), pages.len());

        advance(stage, BuildStage::Rendering);
        let mut rendered: Vec<RenderedPage> = Vec::new();
        let mut sources: Vec<(String, PathBuf)> = Vec::new();
        for doc in posts.iter().chain(pages.iter()) {
            match self.renderer.render(doc) {
                Ok(page) => {
                    sources.push((page.url_path.clone(), doc.full_source.clone()));
                    rendered.push(page);
                }
                Err(e) => self.document_error(e, &mut report)?,
            }
        }

        // Front page, unless some document already claims the site root
        if !sources.iter().any(|(url, _)| url.is_empty()) {
            if let Some(page) = self.renderer.render_index(&posts) {
                sources.push((String::new(), PathBuf::from("<front page>")));
                rendered.push(page);
            }
        }

        // No two documents may share an output file
        check_collisions(&sources)?;

        advance(stage, BuildStage::Writing);
        fs::create_dir_all(&self.site.output_dir).map_err(|source| BuildError::Write {
            path: self.site.output_dir.clone(),
            source,
        })?;

        for page in &rendered {
            self.writer.write(page)?;
            report.written += 1;
        }

        if let Some(xml) = feed::atom_feed(&self.site.config, &posts) {
            let path = self.site.output_dir.join("atom.xml");
            self.writer.write_file(&path, xml.as_bytes())?;
            report.written += 1;
        }

        Ok(report)
    }

    /// Strict mode aborts on the first document error; best-effort mode
    /// logs it and moves on.
    fn document_error(
        &self,
        err: BuildError,
        report: &mut BuildReport,
    ) -> Result<(), BuildError> {
        if err.is_fatal() || self.site.config.strict {
            return Err(err);
        }
        tracing::warn!("Skipping document: {}", err);
        report.skipped.push(err);
        Ok(())
    }
}

fn advance(stage: &mut BuildStage, next: BuildStage) {
    tracing::debug!("Pipeline {:?} -> {:?}", stage, next);
    *stage = next;
}
