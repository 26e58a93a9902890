use anyhow::Result;
use bom_scraper::errors::SelfTestError;
use bom_scraper::initialization::init;
use bom_scraper::self_test::self_test;

fn main() -> Result<()> {
    // If initialization fails, logging is not set up yet so all we can do is return the error
    let (config, bom) = match init() {
        Ok((c, b)) => (c, b),
        Err(e) => {
            return Err(anyhow::anyhow!("Initialization failed: {}", e));
        }
    };

    let location = config.scraper.location_name;
    let shown = location.to_text().unwrap_or_default();
    if !self_test(&bom, location) {
        return Err(SelfTestError(shown).into());
    }

    Ok(())
}
