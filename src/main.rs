use std::sync::Arc;

use waybill::config::Config;
use waybill::engine::Engine;
use waybill::error::Error;
use waybill::external::GoogleMaps;
use waybill::map::VirtualMap;
use waybill::server::serve;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    let google_maps = Arc::new(GoogleMaps::new(&config));
    let map = Arc::new(VirtualMap::new());
    map.mount(config.viewport).await;

    let engine = Engine::new(&config, google_maps.clone(), google_maps, map.clone());
    engine.spawn_renderer();

    serve(engine, map, config.listen_addr).await
}
