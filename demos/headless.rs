use geopick::{InputEvent, LatLng, MapEvent, MapPicker, PickerConfig, Point};

/// Drives the picker without any UI: drags the marker, then searches for an
/// address and jumps to the first match.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut picker = MapPicker::new(PickerConfig::default())?;
    picker.initialize()?;
    picker.on("popupopen", |event| {
        if let MapEvent::PopupOpened { content } = event {
            println!("   popup: {}", content);
        }
    })?;

    let view = picker.view()?;
    println!("Picker ready at {} (zoom {})", view.center, view.zoom);
    println!("   latitude  {}", picker.latitude()?);
    println!("   longitude {}", picker.longitude()?);

    println!("\nDragging the marker to Paris");
    picker.handle_input(InputEvent::MarkerDragStart)?;
    picker.handle_input(InputEvent::MarkerDrag {
        to: LatLng::new(48.8566, 2.3522),
    })?;
    picker.handle_input(InputEvent::MarkerDragEnd)?;
    picker.process_events()?;
    println!("   latitude  {}", picker.latitude()?);
    println!("   longitude {}", picker.longitude()?);
    println!("   zoom      {}", picker.view()?.zoom);

    println!("\nNudging the marker 40px east");
    picker.handle_input(InputEvent::MarkerDragStart)?;
    picker.handle_input(InputEvent::MarkerDragByPixels {
        delta: Point::new(40.0, 0.0),
    })?;
    picker.handle_input(InputEvent::MarkerDragEnd)?;
    picker.process_events()?;
    println!("   longitude {}", picker.longitude()?);

    let query = std::env::args().nth(1).unwrap_or_else(|| "Berlin".to_string());
    println!("\nSearching for {:?}", query);
    picker.search(&query).await;

    for (index, place) in picker.candidates().iter().enumerate() {
        println!("   [{}] {} ({}, {})", index, place.display_name, place.lat, place.lon);
    }

    if picker.candidates().is_empty() {
        println!("   no matches");
        return Ok(());
    }

    picker.choose_candidate(0)?;
    picker.process_events()?;
    let view = picker.view()?;
    println!("\nChose the first match, now at zoom {}", view.zoom);
    println!("   latitude  {}", view.fields.latitude);
    println!("   longitude {}", view.fields.longitude);

    Ok(())
}
