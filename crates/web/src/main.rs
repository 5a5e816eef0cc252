//! Native preview: fetch the catalog, apply filters, print the markup the
//! widget would put on the page.
//!
//! Built only with the `preview` feature.

mod preview {
    use anyhow::Context;
    use clap::Parser;
    use shortlist_products::FilterState;
    use shortlist_web::controls::parse_selection;
    use shortlist_web::{CatalogClient, Effect, PageSession, Renderer, SessionEvent, WidgetConfig};

    #[derive(Debug, Parser)]
    #[command(name = "shortlist-preview", about = "Render one page of the product shortlist")]
    pub struct Args {
        /// Facet selections, e.g. `brand=AMD socket=AM5 cores=16`.
        #[arg(value_name = "FACET=VALUE")]
        selections: Vec<String>,

        /// Price ceiling (defaults to SHORTLIST_MAX_PRICE or 1000).
        #[arg(long)]
        max_price: Option<f64>,

        /// Page to render.
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Backend base URL, overrides SHORTLIST_API_HOST.
        #[arg(long)]
        api_host: Option<String>,
    }

    pub async fn run(args: Args) -> anyhow::Result<()> {
        let mut config = WidgetConfig::from_env().context("reading widget configuration")?;
        if let Some(host) = args.api_host {
            config = config.with_api_host(host.trim_end_matches('/'));
        }

        let mut filters = FilterState::new(args.max_price.unwrap_or(config.default_max_price));
        for raw in &args.selections {
            let (facet, value) =
                parse_selection(raw).with_context(|| format!("invalid selection `{raw}`"))?;
            filters.select(facet, &value);
        }

        let renderer = Renderer::new(config.clone()).context("compiling templates")?;
        let client = CatalogClient::new(&config);
        let mut session = PageSession::new(config);

        match client.fetch_catalog().await {
            Ok(catalog) => {
                session.update(SessionEvent::CatalogLoaded(catalog));
            }
            Err(err) => {
                session.update(SessionEvent::CatalogFailed(err.user_message().to_string()));
                let rendered = renderer.render(&session)?;
                println!("{}", rendered.grid_html);
                return Err(err).context(format!("fetching {}", client.products_url()));
            }
        }

        session.update(SessionEvent::FiltersChanged(filters));
        if session.update(SessionEvent::PageSelected(args.page)) == Effect::None {
            tracing::warn!(
                page = args.page,
                total_pages = session.total_pages(),
                "requested page is out of range; showing page 1"
            );
        }

        let rendered = renderer.render(&session)?;
        tracing::info!(
            matched = session.filtered_len(),
            page = session.current_page(),
            total_pages = session.total_pages(),
            "rendered"
        );
        println!("{}", rendered.grid_html);
        println!("{}", rendered.pagination_html);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use clap::Parser;

    shortlist_observability::init();
    preview::run(preview::Args::parse()).await
}
