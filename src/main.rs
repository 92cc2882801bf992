use max_random_baseline::probability::SuccessProb;
use max_random_baseline::max_order_statistic::MaxOrderStatisticPoissonBinomial;
use max_random_baseline::poisson_binomial::PoissonBinomial;
use max_random_baseline::compare_theoretical;
use max_random_baseline::DiscreteDistribution;

fn main() {
    println!("最大ランダムベースライン計算プログラム");

    // 個々の値をセットする場合のコード例
    // let n = 100;
    // let t = 10;
    // let prob = SuccessProb::Uniform(0.5);
    // let order = MaxOrderStatisticPoissonBinomial::new(n, &prob).unwrap();
    // println!("{:?}", order.max_random_baseline(t));

    data_for_report().unwrap();
}

// レポートデータ作成用
fn data_for_report() -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all("test")?;

    let n = 100;
    let prob = SuccessProb::Uniform(0.5);
    let order = MaxOrderStatisticPoissonBinomial::new(n, &prob)?;

    // 分類器の個数ごとのベースラインとp値
    let ts = [1, 10, 100, 1000];
    for t in ts {
        let baseline = order.max_random_baseline(t)?;
        let acc = order.max_random_accuracy(t)?;
        let p = order.p_value(0.6, t)?;
        println!("t = {:>4}: E[M] = {:.4}, accuracy = {:.4}, p(acc=0.6) = {:.6}", t, baseline, acc, p);

        let path_max = format!("test/max_distribution_n={}_t={}.xlsx", n, t);
        let dist = order.max_distribution(t)?;
        dist.overview_to_excel(&path_max)?;
    }

    // 1回の試行の分布と二項分布の理論値との比較
    let pb = PoissonBinomial::new(&vec![0.5; n])?;
    let path_single = format!("test/single_draw_n={}.xlsx", n);
    pb.overview_to_excel(&path_single)?;
    let path_compare = format!("test/compare_binomial_n={}.xlsx", n);
    compare_theoretical::compare_overview_to_excel(&pb, &path_compare)?;

    // ラベル数が混在するデータセットの例
    let mut counts = std::collections::BTreeMap::new();
    counts.insert(2, 50);
    counts.insert(5, 50);
    let order_mixed = MaxOrderStatisticPoissonBinomial::new(100, &SuccessProb::LabelCounts(counts))?;
    for t in ts {
        let baseline = order_mixed.max_random_baseline(t)?;
        println!("mixed labels, t = {:>4}: E[M] = {:.4}", t, baseline);
    }

    println!("Calculated");
    Ok(())
}
