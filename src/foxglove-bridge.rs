// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

use clap::Parser;
use edgefirst_converters::{
    Args, Decompressor, SharedOptions,
    frame::{DetectFrame, MaskFrame, RadarCubeFrame},
    fusion::boxes3d::detect_to_scene,
    model::{
        boxes2d::detect_to_annotations,
        mask::{mask_to_annotations, mask_to_image},
    },
    radar::cube::cube_to_image,
};
use edgefirst_schemas::edgefirst_msgs::{Detect, Mask, RadarCube};
use foxglove::{WebSocketServer, log};
use serde_json::{Map, Value};
use tokio::task;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use zenoh::{Config, Session, handlers::FifoChannelHandler, pubsub::Subscriber, sample::Sample};

async fn model_boxes2d_handler(
    sub: Subscriber<FifoChannelHandler<Sample>>,
    options: SharedOptions,
) {
    while let Ok(msg) = sub.recv_async().await {
        let detect = match cdr::deserialize::<Detect>(&msg.payload().to_bytes()) {
            Ok(v) => DetectFrame::from(v),
            Err(e) => {
                warn!("Failed to deserialize detect message: {e:?}");
                continue; // skip this message and continue
            }
        };
        let options = options.snapshot();
        log!("/camera/boxes2d", detect_to_annotations(&detect, &options));
        log!("/scene/boxes3d", detect_to_scene(&detect, &options));
    }
}

async fn model_mask_handler(sub: Subscriber<FifoChannelHandler<Sample>>, decoder: Decompressor) {
    while let Ok(msg) = sub.recv_async().await {
        let mask = match cdr::deserialize::<Mask>(&msg.payload().to_bytes()) {
            Ok(v) => MaskFrame::from(v),
            Err(e) => {
                warn!("Failed to deserialize mask: {e:?}");
                continue;
            }
        };
        log!("/camera/mask", mask_to_image(&mask, &decoder));
        log!("/camera/mask/annotations", mask_to_annotations(&mask, &decoder));
    }
}

async fn radar_cube_handler(sub: Subscriber<FifoChannelHandler<Sample>>, options: SharedOptions) {
    while let Ok(msg) = sub.recv_async().await {
        let cube = match cdr::deserialize::<RadarCube>(&msg.payload().to_bytes()) {
            Ok(v) => RadarCubeFrame::from(v),
            Err(e) => {
                warn!("Failed to deserialize radar cube: {e:?}");
                continue;
            }
        };
        log!("/radar/cube", cube_to_image(&cube, &options.snapshot()));
    }
}

async fn variables_handler(sub: Subscriber<FifoChannelHandler<Sample>>, options: SharedOptions) {
    while let Ok(msg) = sub.recv_async().await {
        match serde_json::from_slice::<Map<String, Value>>(&msg.payload().to_bytes()) {
            Ok(variables) => options.apply_variables(&variables),
            Err(e) => warn!("Failed to parse display variables: {e}"),
        }
    }
}

async fn subscribe(
    session: &Session,
    topic: &str,
) -> anyhow::Result<Subscriber<FifoChannelHandler<Sample>>> {
    info!("Subscribing to {topic}");
    session
        .declare_subscriber(topic.to_string())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to subscribe to {}: {}", topic, e))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let options = SharedOptions::new(args.display_options());

    // Masks that arrive before the decoder is ready are published empty.
    let decoder = Decompressor::new();
    decoder.spawn_init();

    let session = zenoh::open(Config::try_from(&args)?)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open Zenoh session: {}", e))?;

    // held until shutdown so the server keeps running
    let _server = WebSocketServer::new()
        .bind(args.bind.clone(), args.port)
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start Foxglove server: {}", e))?;
    info!("Foxglove server listening on {}:{}", args.bind, args.port);

    let sub = subscribe(&session, &args.boxes_topic).await?;
    task::spawn(model_boxes2d_handler(sub, options.clone()));

    for topic in &args.mask_topics {
        let sub = subscribe(&session, topic).await?;
        task::spawn(model_mask_handler(sub, decoder.clone()));
    }

    let sub = subscribe(&session, &args.radar_topic).await?;
    task::spawn(radar_cube_handler(sub, options.clone()));

    let sub = subscribe(&session, &args.variables_topic).await?;
    task::spawn(variables_handler(sub, options));

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");

    Ok(())
}
