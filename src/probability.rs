//! 各問題の正答確率の指定と正規化
//!
//! 正答確率は3通りの形式で指定できる．
//! いずれの形式も長さ $n$ の確率ベクトルへ正規化されてから分布計算に渡される．

use std::collections::BTreeMap;

use super::BaselineError;


/// 各問題の正答確率の指定方法を示す型
/// 次の3種類のうち，どの形式であるかを示す．
///
/// - 一様な確率 `Uniform` - 全ての問題で同一の正答確率 $p$
/// - ラベル数の度数 `LabelCounts` - ラベル数 $L$ からそのラベル数を持つ問題数 $c$ への写像．
///   各組は確率 $1/L$ の問題 $c$ 問に展開される．
/// - 問題ごとの確率 `PerExample` - 長さ $n$ の確率のリスト
#[derive(Debug, Clone)]
pub enum SuccessProb {
    Uniform(f64),
    LabelCounts(BTreeMap<usize, usize>),
    PerExample(Vec<f64>),
}


impl SuccessProb {
    /// 指定された形式を長さ $n$ の確率ベクトルへ正規化する
    ///
    /// 全ての公開関数はこの関数を経由してから分布を構成するため，
    /// 不正な入力はここで検出される．
    ///
    /// # 引数
    /// * `n` - データセットの問題数
    ///
    /// # 使用例
    /// ```
    /// # use max_random_baseline::probability::SuccessProb;
    /// let prob = SuccessProb::Uniform(0.5);
    /// let ps = prob.to_probability_vector(4).unwrap();
    /// assert_eq!(ps, vec![0.5, 0.5, 0.5, 0.5]);
    /// ```
    pub fn to_probability_vector(&self, n: usize) -> Result<Vec<f64>, BaselineError> {
        let ps = match self {
            SuccessProb::Uniform(p) => {
                    vec![*p; n]
                },
            SuccessProb::LabelCounts(counts) => {
                    let total: usize = counts.values().sum();
                    if total != n {
                        return Err(BaselineError {
                            message: format!("label counts sum to {} but n is {}.", total, n)
                        });
                    }
                    counts.iter()
                          .flat_map(|(num_labels, num_examples)| {
                              let p = 1.0 / (*num_labels as f64);
                              std::iter::repeat(p).take(*num_examples)
                          })
                          .collect::<Vec<f64>>()
                },
            SuccessProb::PerExample(ps) => {
                    if ps.len() != n {
                        return Err(BaselineError {
                            message: format!("length of probability vector ({}) does not match n ({}).", ps.len(), n)
                        });
                    }
                    ps.clone()
                },
        };

        // ラベル数0など不正な指定はここで検出される（1/0 = inf）
        for p in ps.iter() {
            if !(0.0..=1.0).contains(p) {
                return Err(BaselineError {
                    message: format!("probability of success {} is out of range [0, 1].", p)
                });
            }
        }
        Ok(ps)
    }
}


impl From<f64> for SuccessProb {
    fn from(p: f64) -> Self {
        SuccessProb::Uniform(p)
    }
}

impl From<Vec<f64>> for SuccessProb {
    fn from(ps: Vec<f64>) -> Self {
        SuccessProb::PerExample(ps)
    }
}

impl From<BTreeMap<usize, usize>> for SuccessProb {
    fn from(counts: BTreeMap<usize, usize>) -> Self {
        SuccessProb::LabelCounts(counts)
    }
}
