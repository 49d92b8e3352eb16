use std::sync::Arc;

use rayon::prelude::*;

use crate::compile::builder::{PlanOptions, build_render_plan};
use crate::compile::plan::RenderPlan;
use crate::compose::pages::{Page, compose_pages};
use crate::foundation::error::{CardgenError, CardgenResult};
use crate::foundation::units::Dpi;
use crate::model::album::Album;
use crate::model::card::{Card, CardKind};
use crate::model::theme::ThemeOverrides;
use crate::text::metrics::FontMetrics;
use crate::theme::resolver::ThemeResolver;

/// Options controlling batch plan building.
#[derive(Clone, Debug, Default)]
pub struct BatchOpts {
    /// Build plans in parallel (rayon), using a dedicated thread pool.
    pub parallel: bool,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
}

/// Session-oriented entry point: owns the theme resolver (with its font cache), the font
/// metrics and the page options shared by every card of a run.
pub struct CardSession {
    resolver: ThemeResolver,
    metrics: Arc<dyn FontMetrics>,
    options: PlanOptions,
}

impl CardSession {
    /// Session over an explicitly constructed resolver and metrics.
    pub fn new(resolver: ThemeResolver, metrics: Arc<dyn FontMetrics>, options: PlanOptions) -> Self {
        Self {
            resolver,
            metrics,
            options,
        }
    }

    /// Theme resolver shared by every card.
    pub fn resolver(&self) -> &ThemeResolver {
        &self.resolver
    }

    /// Page options applied to every plan.
    pub fn options(&self) -> &PlanOptions {
        &self.options
    }

    /// Resolve `overrides` against the session theme and build a single-album card.
    pub fn card_single(
        &self,
        kind: CardKind,
        album: Album,
        overrides: &ThemeOverrides,
    ) -> CardgenResult<Card> {
        let theme = self.resolver.resolve(overrides)?;
        Card::single(kind, album, Arc::new(theme))
    }

    /// Resolve `overrides` and build a double-album card.
    pub fn card_double(
        &self,
        first: Album,
        second: Album,
        overrides: &ThemeOverrides,
    ) -> CardgenResult<Card> {
        let theme = self.resolver.resolve(overrides)?;
        Ok(Card::double(first, second, Arc::new(theme)))
    }

    /// Build one card's plan.
    pub fn build_render_plan(&self, card: &Card, dpi: Dpi) -> CardgenResult<RenderPlan> {
        build_render_plan(card, dpi, self.metrics.as_ref(), &self.options)
    }

    /// Build one plan per card. Results keep input order; a failing card only fails its own
    /// entry.
    #[tracing::instrument(skip(self, cards), fields(cards = cards.len()))]
    pub fn build_render_plans(
        &self,
        cards: &[Card],
        dpi: Dpi,
        opts: &BatchOpts,
    ) -> CardgenResult<Vec<CardgenResult<RenderPlan>>> {
        if !opts.parallel {
            return Ok(cards
                .iter()
                .map(|card| self.build_render_plan(card, dpi))
                .collect());
        }
        let pool = build_thread_pool(opts.threads)?;
        Ok(pool.install(|| {
            cards
                .par_iter()
                .map(|card| self.build_render_plan(card, dpi))
                .collect()
        }))
    }

    /// Impose plans built at `dpi` onto pages using the session page options.
    pub fn compose_pages(&self, plans: &[RenderPlan], dpi: Dpi) -> CardgenResult<Vec<Page>> {
        compose_pages(plans, self.options.page_size, dpi, self.options.crop_marks)
    }
}

fn build_thread_pool(threads: Option<usize>) -> CardgenResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(CardgenError::config("batch 'threads' must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| CardgenError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/session/engine.rs"]
mod tests;
