mod service {
  use rhull::config::Config;
  use rhull::data::Point;
  use rhull::service::*;

  use rand::{Rng, SeedableRng};

  fn body(points: &[Point], alpha: Option<f64>) -> String {
    serde_json::to_string(&ConcaveHullRequest {
      points: points.to_vec(),
      alpha,
    })
    .unwrap()
  }

  #[test]
  fn json_round_trip_matches_engine() {
    let mut rng = rand::rngs::SmallRng::seed_from_u64(2);
    let pts: Vec<Point> = (0..200).map(|_| rng.gen()).collect();
    let service = HullService::new(Config::default());

    let reply = service.handle_json(Operation::ConcaveHull, &body(&pts, Some(0.2)));
    assert_eq!(reply.status, 200);
    let response: HullResponse = serde_json::from_str(&reply.body).unwrap();
    let expected = rhull::concave_hull(&pts, 0.2).unwrap();
    if expected.is_degenerate() {
      assert!(response.hull.is_empty());
    } else {
      assert_eq!(response.hull, expected.into_points());
    }
  }

  #[test]
  fn config_drives_defaults() {
    let config = Config::from_json(r#"{"default_alpha": 0.0001, "max_points": 100}"#).unwrap();
    let service = HullService::new(config);
    let square = [[0., 0.], [1., 0.], [1., 1.], [0., 1.]].map(Point::new);

    // Alpha falls back to the configured default and keeps nothing.
    let reply = service.handle_json(Operation::ConcaveHull, &body(&square, None));
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body, r#"{"hull":[]}"#);

    let reply = service.handle_json(Operation::ConcaveHull, &body(&square, Some(5.)));
    let response: HullResponse = serde_json::from_str(&reply.body).unwrap();
    assert_eq!(response.hull, square.to_vec());

    let many = vec![Point::new([0., 0.]); 101];
    let reply = service.handle_json(Operation::ConvexHull, &body(&many, None));
    assert_eq!(reply.status, 413);
  }

  #[test]
  fn flat_transport() {
    let service = HullService::new(Config::default());
    let values = [0., 0., 3., 0., 3., 3., 0., 3., 1., 2.];
    let hull = service
      .handle_flat(Operation::from_route("/convexhull").unwrap(), &values, None)
      .unwrap();
    assert_eq!(hull, vec![0., 0., 3., 0., 3., 3., 0., 3.]);
    assert_eq!(
      service
        .handle_flat(Operation::ConvexHull, &values[..3], None)
        .unwrap_err()
        .status_code(),
      400
    );
  }
}
